use crate::{
    error::AppResult,
    models::User,
    storage::{StorageHandle, keys},
};

#[derive(Clone)]
pub struct UserStore {
    storage: StorageHandle,
}

impl UserStore {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Vec<User> {
        self.storage.read_list(keys::USERS)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.get()
            .into_iter()
            .find(|user| user.email.to_lowercase() == email)
    }

    pub fn insert(&self, user: User) -> AppResult<()> {
        let mut users = self.get();
        users.push(user);
        self.storage.write_json(keys::USERS, &users)
    }
}
