//! Abstract operations.
//!
//! Remote collaborators map them onto their own verbs: [`Select`] reads,
//! [`Insert`] creates, [`Update`] replaces in place and [`Delete`] removes.

/// Operation to read a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation to create a value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to replace a value in place.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation to remove a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);
