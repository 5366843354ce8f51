use thiserror::Error;

/// A checked access named an alternative that is not live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BadAccess {
    #[error("the variant holds a different alternative")]
    WrongAlternative,
    #[error("the variant is valueless")]
    Valueless,
}

impl BadAccess {
    /// Turns the bad access into a fatal fault.
    ///
    /// Panics with the error message, or aborts the process when the
    /// `abort-on-bad-access` feature is enabled.
    #[cold]
    #[track_caller]
    pub fn fail(self) -> ! {
        #[cfg(feature = "abort-on-bad-access")]
        {
            let _ = self;
            std::process::abort()
        }
        #[cfg(not(feature = "abort-on-bad-access"))]
        panic!("bad variant access: {self}")
    }
}
