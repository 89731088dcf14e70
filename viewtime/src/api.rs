//! Status-code surface over [`Catalog`].
//!
//! Mirrors a C-style integer contract: every operation reports one of four
//! statuses with stable integer codes, operations take an optional handle,
//! and a missing handle is invalid input rather than a panic. The shell and
//! other external callers talk to the catalog exclusively through this
//! module.

use std::fmt;

use crate::catalog::Catalog;
use crate::error::Error;

/// Operation status with the stable integer codes of the external
/// interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    Failure = -1,
    AllocationError = -2,
    InvalidInput = -3,
}

impl Status {
    /// The integer code of this status.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::AllocationError => "ALLOCATION_ERROR",
            Status::InvalidInput => "INVALID_INPUT",
        })
    }
}

impl From<&Error> for Status {
    fn from(e: &Error) -> Self {
        match e {
            Error::InvalidInput | Error::OutOfBounds(_) => Status::InvalidInput,
            Error::CourseExists(_)
            | Error::CourseNotFound(_)
            | Error::RankOutOfRange(_)
            | Error::KeyNotFound(_) => Status::Failure,
            Error::Allocation(_) => Status::AllocationError,
        }
    }
}

/// Construct a fresh catalog handle; `None` when the initial allocation
/// fails.
pub fn init() -> Option<Box<Catalog>> {
    Catalog::new().ok().map(Box::new)
}

/// Destroy the catalog behind the handle and null it out.
pub fn quit(catalog: &mut Option<Box<Catalog>>) {
    *catalog = None;
}

pub fn add_course(catalog: Option<&mut Catalog>, course: i32) -> Status {
    match catalog {
        None => Status::InvalidInput,
        Some(catalog) => status(catalog.add_course(course)),
    }
}

pub fn remove_course(catalog: Option<&mut Catalog>, course: i32) -> Status {
    match catalog {
        None => Status::InvalidInput,
        Some(catalog) => status(catalog.remove_course(course)),
    }
}

pub fn add_class(catalog: Option<&mut Catalog>, course: i32) -> Result<i32, Status> {
    match catalog {
        None => Err(Status::InvalidInput),
        Some(catalog) => catalog.add_class(course).map_err(|e| Status::from(&e)),
    }
}

pub fn watch_class(catalog: Option<&mut Catalog>, course: i32, class: i32, time: i32) -> Status {
    match catalog {
        None => Status::InvalidInput,
        Some(catalog) => status(catalog.watch_class(course, class, time)),
    }
}

pub fn time_viewed(catalog: Option<&Catalog>, course: i32, class: i32) -> Result<i32, Status> {
    match catalog {
        None => Err(Status::InvalidInput),
        Some(catalog) => catalog
            .time_viewed(course, class)
            .map_err(|e| Status::from(&e)),
    }
}

pub fn ith_watched_class(catalog: Option<&Catalog>, i: i32) -> Result<(i32, i32), Status> {
    match catalog {
        None => Err(Status::InvalidInput),
        Some(catalog) => catalog
            .ith_watched_class(i)
            .map_err(|e| Status::from(&e)),
    }
}

fn status(result: crate::Result<()>) -> Status {
    match result {
        Ok(()) => Status::Success,
        Err(e) => Status::from(&e),
    }
}
