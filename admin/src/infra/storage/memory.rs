//! In-memory [`Storage`] implementation.

use std::{cell::RefCell, collections::HashMap};

use tracerr::Traced;

use super::{Error, Storage};

/// [`Storage`] keeping values in memory only.
///
/// Everything is lost once it's dropped.
#[derive(Debug, Default)]
pub struct Memory(RefCell<HashMap<String, String>>);

impl Storage for Memory {
    fn get(&self, key: &str) -> Result<Option<String>, Traced<Error>> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), Traced<Error>> {
        _ = self.0.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Traced<Error>> {
        _ = self.0.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use super::{Memory, Storage as _};

    #[test]
    fn stores_and_removes_values() {
        let storage = Memory::default();
        assert_eq!(storage.get("token").unwrap(), None);

        storage.set("token", "abc".into()).unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));

        storage.set("token", "def".into()).unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("def"));

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn removing_absent_key_is_noop() {
        let storage = Memory::default();

        storage.remove("user").unwrap();
        assert_eq!(storage.get("user").unwrap(), None);
    }
}
