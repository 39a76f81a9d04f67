//! Profile updates.

use std::path::PathBuf;

/// Multipart payload for `PUT /user/profile/update`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name.
    pub full_name: Option<String>,
    /// New contact number.
    pub contact_number: Option<String>,
    /// New profile picture.
    pub avatar: Option<PathBuf>,
}

impl ProfileUpdate {
    /// Whether nothing would change.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.contact_number.is_none() && self.avatar.is_none()
    }
}
