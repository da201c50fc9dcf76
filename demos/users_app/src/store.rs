//! In-memory user storage.
//!
//! One coroutine owns the user list and serves commands from a channel, so
//! reads and writes never race. [`UserStore`] is the cloneable client.

use crate::model::{NewUser, User, UserPatch};
use may::coroutine;
use may::sync::mpsc;
use std::fmt;
use std::io;
use tracing::{debug, info};
use typed_route::RouteError;
use uuid::Uuid;

/// Identifier of the user every fresh store starts with
pub const SEED_USER_ID: Uuid = Uuid::from_u128(0xC03A_B8DC_2F09_415F_AF30_7E86_3292_C064);

/// The user every fresh store starts with.
#[must_use]
pub fn seed_users() -> Vec<User> {
    vec![User {
        id: SEED_USER_ID,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret".to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No user with this id
    NotFound(Uuid),
    /// The store coroutine is gone
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "user {id} not found"),
            StoreError::Unavailable => write!(f, "user store is unavailable"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for RouteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RouteError::not_found(format!("user {id}")),
            StoreError::Unavailable => RouteError::Internal(err.to_string()),
        }
    }
}

enum Command {
    List {
        name: Option<String>,
        reply: mpsc::Sender<Vec<User>>,
    },
    Create {
        new: NewUser,
        reply: mpsc::Sender<User>,
    },
    Read {
        id: Uuid,
        reply: mpsc::Sender<Option<User>>,
    },
    Update {
        id: Uuid,
        patch: UserPatch,
        reply: mpsc::Sender<Option<User>>,
    },
    Delete {
        id: Uuid,
        reply: mpsc::Sender<Option<User>>,
    },
}

/// Handle to the store coroutine
#[derive(Clone)]
pub struct UserStore {
    tx: mpsc::Sender<Command>,
}

impl UserStore {
    /// Start a store seeded with [`seed_users`]
    ///
    /// # Errors
    ///
    /// Returns an error if the store coroutine cannot be spawned.
    pub fn spawn() -> io::Result<Self> {
        Self::spawn_with(seed_users())
    }

    /// Start a store holding `users`
    ///
    /// # Errors
    ///
    /// Returns an error if the store coroutine cannot be spawned.
    pub fn spawn_with(users: Vec<User>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Command>();
        info!(users = users.len(), "Starting user store");

        // SAFETY: the store loop owns its state and only blocks on may channels.
        unsafe {
            coroutine::Builder::new()
                .name("user-store".to_string())
                .spawn(move || serve(users, rx))?;
        }
        Ok(Self { tx })
    }

    /// All users, or only those whose name matches exactly
    ///
    /// # Errors
    ///
    /// `StoreError::Unavailable` if the store coroutine has stopped.
    pub fn list(&self, name: Option<&str>) -> Result<Vec<User>, StoreError> {
        self.request(|reply| Command::List {
            name: name.map(str::to_string),
            reply,
        })
    }

    /// Insert a new user under a fresh id.
    ///
    /// # Errors
    ///
    /// `StoreError::Unavailable` if the store coroutine has stopped.
    pub fn create(&self, new: NewUser) -> Result<User, StoreError> {
        self.request(|reply| Command::Create { new, reply })
    }

    /// # Errors
    ///
    /// `StoreError::NotFound` for an unknown id.
    pub fn get(&self, id: Uuid) -> Result<User, StoreError> {
        self.request(|reply| Command::Read { id, reply })?
            .ok_or(StoreError::NotFound(id))
    }

    /// # Errors
    ///
    /// `StoreError::NotFound` for an unknown id.
    pub fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, StoreError> {
        self.request(|reply| Command::Update { id, patch, reply })?
            .ok_or(StoreError::NotFound(id))
    }

    /// # Errors
    ///
    /// `StoreError::NotFound` for an unknown id.
    pub fn delete(&self, id: Uuid) -> Result<User, StoreError> {
        self.request(|reply| Command::Delete { id, reply })?
            .ok_or(StoreError::NotFound(id))
    }

    fn request<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> Command) -> Result<T, StoreError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.recv().map_err(|_| StoreError::Unavailable)
    }
}

fn reply<T>(tx: &mpsc::Sender<T>, value: T) {
    if tx.send(value).is_err() {
        debug!("Store caller went away before the reply");
    }
}

fn serve(mut users: Vec<User>, rx: mpsc::Receiver<Command>) {
    for command in rx.iter() {
        match command {
            Command::List { name, reply: tx } => {
                let found = users
                    .iter()
                    .filter(|u| name.as_deref().map_or(true, |n| u.name == n))
                    .cloned()
                    .collect();
                reply(&tx, found);
            }
            Command::Create { new, reply: tx } => {
                let user = User {
                    id: Uuid::new_v4(),
                    name: new.name,
                    email: new.email,
                    password: new.password,
                };
                debug!(user_id = %user.id, "User created");
                users.push(user.clone());
                reply(&tx, user);
            }
            Command::Read { id, reply: tx } => {
                reply(&tx, users.iter().find(|u| u.id == id).cloned());
            }
            Command::Update { id, patch, reply: tx } => {
                let updated = users.iter_mut().find(|u| u.id == id).map(|user| {
                    user.apply(patch);
                    user.clone()
                });
                reply(&tx, updated);
            }
            Command::Delete { id, reply: tx } => {
                let removed = users
                    .iter()
                    .position(|u| u.id == id)
                    .map(|index| users.remove(index));
                if removed.is_some() {
                    debug!(user_id = %id, "User deleted");
                }
                reply(&tx, removed);
            }
        }
    }
    info!("User store stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_seeded_with_alice() {
        let store = UserStore::spawn().unwrap();
        let users = store.list(None).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, SEED_USER_ID);
        assert_eq!(store.get(SEED_USER_ID).unwrap().name, "Alice");
    }

    #[test]
    fn test_create_assigns_fresh_ids() {
        let store = UserStore::spawn_with(Vec::new()).unwrap();
        let a = store.create(new_user("Ann")).unwrap();
        let b = store.create(new_user("Ben")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list(None).unwrap().len(), 2);
        assert_eq!(store.list(Some("Ben")).unwrap(), vec![b]);
    }

    #[test]
    fn test_update_and_delete_unknown_id() {
        let store = UserStore::spawn().unwrap();
        let id = Uuid::new_v4();
        assert_eq!(store.get(id), Err(StoreError::NotFound(id)));
        assert_eq!(
            store.update(id, UserPatch::default()),
            Err(StoreError::NotFound(id))
        );
        assert_eq!(store.delete(id), Err(StoreError::NotFound(id)));
    }

    #[test]
    fn test_concurrent_clients_see_serialised_writes() {
        const CLIENTS: usize = 8;
        const PER_CLIENT: usize = 20;

        let store = UserStore::spawn().unwrap();
        let workers: Vec<_> = (0..CLIENTS)
            .map(|client| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut kept = Vec::new();
                    for n in 0..PER_CLIENT {
                        let user = store.create(new_user(&format!("U{client}x{n}"))).unwrap();
                        let patch = UserPatch {
                            name: Some(format!("P{client}x{n}")),
                            ..UserPatch::default()
                        };
                        assert_eq!(store.update(user.id, patch).unwrap().id, user.id);
                        if n % 2 == 0 {
                            assert_eq!(store.delete(user.id).unwrap().id, user.id);
                        } else {
                            kept.push(user.id);
                        }
                    }
                    kept
                })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for worker in workers {
            for id in worker.join().unwrap() {
                assert!(ids.insert(id), "duplicate id {id}");
            }
        }

        let users = store.list(None).unwrap();
        assert_eq!(ids.len(), CLIENTS * PER_CLIENT / 2);
        assert_eq!(users.len(), ids.len() + 1);
        for user in users.iter().filter(|u| u.id != SEED_USER_ID) {
            assert!(ids.contains(&user.id));
            assert!(user.name.starts_with('P'));
        }
    }

    #[test]
    fn test_delete_removes_record() {
        let store = UserStore::spawn().unwrap();
        let removed = store.delete(SEED_USER_ID).unwrap();
        assert_eq!(removed.name, "Alice");
        assert!(store.list(None).unwrap().is_empty());
        assert_eq!(
            RouteError::from(store.get(SEED_USER_ID).unwrap_err()).status(),
            404
        );
    }
}
