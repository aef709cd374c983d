use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UI theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "light" => Some(Self::Light),
      "dark" => Some(Self::Dark),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Light => "light",
      Self::Dark => "dark",
    }
  }
}

#[derive(Debug, Clone)]
pub struct User {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub password_hash: String,
  pub mobile: Option<String>,
  pub theme: Theme,
  pub last_logged_in: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// What the API reveals about a user (never the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub theme: Theme,
}

impl From<&User> for PublicUser {
  fn from(user: &User) -> Self {
    Self {
      id: user.id.clone(),
      first_name: user.first_name.clone(),
      last_name: user.last_name.clone(),
      email: user.email.clone(),
      theme: user.theme,
    }
  }
}

/// Emails are matched case-insensitively and stored trimmed
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}
