use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Organisasi,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Organisasi => "ORGANISASI",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Role::Student),
            "ORGANISASI" => Ok(Role::Organisasi),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            _ => Err(Error::ServerError(format!("invalid role({})", s))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub nim: Option<String>,
    pub password: String,
    pub salt: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Result<Role, Error> {
        self.role.parse()
    }

    pub fn profile(&self) -> Result<Profile, Error> {
        Ok(Profile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            nim: self.nim.clone(),
            role: self.role()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub name: String,
    pub email: String,
    pub nim: Option<String>,
    pub password: String,
    pub salt: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub nim: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub nim: Option<String>,
    pub role: Role,
}
