use hex::ToHex;
use log::{info, warn};
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

use crate::config::AdminSeed;
use crate::core::models::user::{Insert, Login, Profile, Role, Signup, User};
use crate::core::ports::repository::{TxStore, UserCommon};
use crate::error::Error;

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

/// Validates and stores a new login. Used for students, organisasi accounts and the seeded admin.
pub(crate) async fn insert_account<D>(db: &mut D, name: &str, email: &str, nim: Option<String>, password: &str, role: Role) -> Result<i32, Error>
where
    D: UserCommon,
{
    let name = name.trim();
    let email = email.trim().to_lowercase();
    if name.is_empty() {
        return Err(Error::BadRequest("name is required".into()));
    }
    if !email.contains('@') {
        return Err(Error::BadRequest("invalid email address".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::BadRequest(format!("password must be at least {} characters", MIN_PASSWORD_LEN)));
    }
    if UserCommon::get_by_email(db, &email).await?.is_some() {
        return Err(Error::Conflict("email already registered".into()));
    }
    let salt = random_salt();
    UserCommon::insert(
        db,
        Insert {
            name: name.to_owned(),
            email,
            nim: nim.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()),
            password: hash_password(password, &salt),
            salt,
            role,
        },
    )
    .await
}

pub async fn signup<T>(mut store: T, data: Signup) -> Result<i32, Error>
where
    T: TxStore,
{
    let id = insert_account(&mut store, &data.name, &data.email, data.nim, &data.password, Role::Student).await?;
    store.commit().await?;
    info!("student {} signed up", id);
    Ok(id)
}

pub async fn login<D>(db: &mut D, Login { email, password }: Login) -> Result<User, Error>
where
    D: UserCommon,
{
    let email = email.trim().to_lowercase();
    if let Some(user) = UserCommon::get_by_email(db, &email).await? {
        if hash_password(&password, &user.salt) == user.password {
            return Ok(user);
        }
    }
    Err(Error::Unauthorized("invalid email or password".into()))
}

pub async fn profile<D>(db: &mut D, uid: i32) -> Result<Profile, Error>
where
    D: UserCommon,
{
    UserCommon::get(db, uid).await?.ok_or(Error::NotFound("user not found".into()))?.profile()
}

/// Creates the configured super-admin if the email is still free. Returns whether an account was created.
pub async fn seed_admin<T>(mut store: T, seed: &AdminSeed) -> Result<bool, Error>
where
    T: TxStore,
{
    if let Some(user) = UserCommon::get_by_email(&mut store, &seed.email.trim().to_lowercase()).await? {
        if user.role()? != Role::SuperAdmin {
            warn!("admin seed email {} belongs to a {} account", user.email, user.role);
        }
        return Ok(false);
    }
    let id = insert_account(&mut store, "Super Admin", &seed.email, None, &seed.password, Role::SuperAdmin).await?;
    store.commit().await?;
    info!("seeded super admin {}", id);
    Ok(true)
}
