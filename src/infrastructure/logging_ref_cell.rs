use std::cell::{Ref, RefCell, RefMut};
use std::fmt::Debug;

/// A `RefCell` for state owned by a single lane that names itself and the call site
/// when a borrow conflict occurs, and can trace every borrow at `debug` level.
#[derive(Debug)]
pub struct LoggingRefCell<T: Debug> {
  inner: RefCell<T>,
  name: &'static str,
  borrow_log_output: bool,
}

impl<T: Debug> LoggingRefCell<T> {
  pub fn new(name: &'static str, value: T) -> Self {
    Self {
      inner: RefCell::new(value),
      name,
      borrow_log_output: false,
    }
  }

  pub fn with_borrow_log_output(mut self, borrow_log_output: bool) -> Self {
    self.borrow_log_output = borrow_log_output;
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn borrow_with_info(&self, function_name: &'static str, module_path: &'static str, line: u32) -> Ref<'_, T> {
    if self.borrow_log_output {
      log::debug!(
        "Attempting to borrow: {} by {}:{} at line {}",
        self.name,
        function_name,
        module_path,
        line
      );
    }
    match self.inner.try_borrow() {
      Ok(guard) => guard,
      Err(err) => panic!(
        "Borrow failed: {} by {}:{} at line {}, err: {:?}",
        self.name, function_name, module_path, line, err
      ),
    }
  }

  pub fn borrow_mut_with_info(
    &self,
    function_name: &'static str,
    module_path: &'static str,
    line: u32,
  ) -> RefMut<'_, T> {
    if self.borrow_log_output {
      log::debug!(
        "Attempting to borrow_mut: {} by {}:{} at line {}",
        self.name,
        function_name,
        module_path,
        line
      );
    }
    match self.inner.try_borrow_mut() {
      Ok(guard) => guard,
      Err(err) => panic!(
        "Borrow_mut failed: {} by {}:{} at line {}, err: {:?}",
        self.name, function_name, module_path, line, err
      ),
    }
  }

  pub fn replace(&self, value: T) -> T {
    self.inner.replace(value)
  }
}

impl<T: Debug + Default> LoggingRefCell<T> {
  pub fn take(&self) -> T {
    self.inner.take()
  }
}

#[macro_export]
macro_rules! borrow_with_log {
  ($ref_cell:expr, $fname:expr) => {
    $ref_cell.borrow_with_info($fname, module_path!(), line!())
  };
}

#[macro_export]
macro_rules! borrow_mut_with_log {
  ($ref_cell:expr, $fname:expr) => {
    $ref_cell.borrow_mut_with_info($fname, module_path!(), line!())
  };
}
