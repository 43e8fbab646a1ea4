use std::fmt;
use std::fmt::Formatter;

/// The error code a response carries.
///
/// Codes up to [`ErrorCode::WITHOUT_EXCEPTION`] are failures a strict caller receives as an error;
/// codes above it are application codes handed back as data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
  pub const SUCCESS: ErrorCode = ErrorCode(0);
  /// Reserved by some transports for "failed without a code"; never raised.
  pub const UNSPECIFIED: ErrorCode = ErrorCode(-1);
  pub const ACTOR_NOT_FOUND: ErrorCode = ErrorCode(100_002);
  /// The destination gave up waiting on its own side.
  pub const ACTOR_TIMEOUT: ErrorCode = ErrorCode(100_004);
  /// No response arrived within the caller's window.
  pub const TIMEOUT: ErrorCode = ErrorCode(100_005);
  pub const WITHOUT_EXCEPTION: ErrorCode = ErrorCode(200_000);

  pub const fn new(code: i32) -> Self {
    Self(code)
  }

  pub fn value(&self) -> i32 {
    self.0
  }

  pub fn is_success(&self) -> bool {
    *self == Self::SUCCESS
  }

  pub fn is_exception_worthy(&self) -> bool {
    !(self.is_success() || *self == Self::UNSPECIFIED || self.0 > Self::WITHOUT_EXCEPTION.0)
  }
}

impl fmt::Display for ErrorCode {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match *self {
      ErrorCode::SUCCESS => write!(f, "success"),
      ErrorCode::ACTOR_NOT_FOUND => write!(f, "actor not found({})", self.0),
      ErrorCode::ACTOR_TIMEOUT => write!(f, "actor timeout({})", self.0),
      ErrorCode::TIMEOUT => write!(f, "timeout({})", self.0),
      _ => write!(f, "{}", self.0),
    }
  }
}

impl From<i32> for ErrorCode {
  fn from(code: i32) -> Self {
    Self(code)
  }
}
