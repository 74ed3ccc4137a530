mod catch_unwind;

pub(crate) use catch_unwind::CatchUnwind;
