//! Analysis entry points on [`Dipscan`](crate::Dipscan), one file per
//! capability.

mod best_time;
mod ladder;
