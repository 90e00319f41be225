//! Access-phrase gate for the record download

use crate::errors::AuthorizationError;

/// Allow-list of phrases that release the exported table
#[derive(Clone, Default)]
pub struct AccessGate {
  phrases: Vec<String>,
}

impl AccessGate {
  pub fn new<I, S>(phrases: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let phrases = phrases.into_iter().map(Into::into).filter(|p: &String| !p.is_empty()).collect();
    Self { phrases }
  }

  /// Accept `phrase` only on an exact match. An empty allow-list denies everything.
  pub fn authorize(&self, phrase: &str) -> Result<(), AuthorizationError> {
    if !phrase.is_empty() && self.phrases.iter().any(|allowed| allowed == phrase) {
      Ok(())
    } else {
      Err(AuthorizationError::Denied)
    }
  }

  pub fn is_open(&self) -> bool {
    !self.phrases.is_empty()
  }
}

impl std::fmt::Debug for AccessGate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AccessGate").field("phrases", &self.phrases.len()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_known_phrase_is_accepted() {
    let gate = AccessGate::new(["open sesame", "letmein"]);
    assert!(gate.authorize("letmein").is_ok());
  }

  #[test]
  fn test_match_is_exact() {
    let gate = AccessGate::new(["open sesame"]);
    assert_eq!(gate.authorize("Open Sesame"), Err(AuthorizationError::Denied));
    assert_eq!(gate.authorize("open sesame "), Err(AuthorizationError::Denied));
    assert_eq!(gate.authorize("open"), Err(AuthorizationError::Denied));
  }

  #[test]
  fn test_empty_allow_list_denies_everything() {
    let gate = AccessGate::default();
    assert!(!gate.is_open());
    assert_eq!(gate.authorize(""), Err(AuthorizationError::Denied));
    assert_eq!(gate.authorize("anything"), Err(AuthorizationError::Denied));
  }

  #[test]
  fn test_empty_phrase_is_never_accepted() {
    let gate = AccessGate::new(vec![String::new(), "real".to_string()]);
    assert_eq!(gate.authorize(""), Err(AuthorizationError::Denied));
  }
}
