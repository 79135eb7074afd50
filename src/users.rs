use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use tracing::debug;

use crate::{
    entities::bot_user,
    error::{StoreError, StoreResult, is_unique_violation},
    models::{NewUser, UserProfile},
};

#[derive(Clone)]
pub struct UserDirectory {
    db: DatabaseConnection,
}

impl UserDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: i64) -> StoreResult<Option<bot_user::Model>> {
        Ok(bot_user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    /// Inserts a user that must not exist yet.
    pub async fn register_user(&self, new: NewUser) -> StoreResult<bot_user::Model> {
        let user_id = new.user_id;
        let model = bot_user::ActiveModel {
            user_id: Set(user_id),
            username: Set(new.username),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
        };

        let user = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) { StoreError::DuplicateUserId(user_id) } else { e.into() }
        })?;
        debug!(user_id, "user registered");
        Ok(user)
    }

    /// Records a sighting of `user_id`, creating the row on first contact.
    ///
    /// Runs as a single `INSERT .. ON CONFLICT` so concurrent sightings of the
    /// same user never race into a duplicate key error. On conflict only the
    /// fields present in `profile` overwrite the stored ones.
    pub async fn observe_user(
        &self,
        user_id: i64,
        profile: UserProfile,
    ) -> StoreResult<bot_user::Model> {
        let mut observed = Vec::new();
        if profile.username.is_some() {
            observed.push(bot_user::Column::Username);
        }
        if profile.first_name.is_some() {
            observed.push(bot_user::Column::FirstName);
        }
        if profile.last_name.is_some() {
            observed.push(bot_user::Column::LastName);
        }

        let mut on_conflict = OnConflict::column(bot_user::Column::UserId);
        if observed.is_empty() {
            on_conflict.do_nothing();
        } else {
            on_conflict.update_columns(observed);
        }

        let model = bot_user::ActiveModel {
            user_id: Set(user_id),
            username: Set(profile.username),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
        };

        let written = bot_user::Entity::insert(model)
            .on_conflict(on_conflict)
            .exec_without_returning(&self.db)
            .await?;
        debug!(user_id, written, "user observed");

        self.get_user(user_id).await?.ok_or(StoreError::UserNotFound(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{file_db, memory_db};

    async fn directory() -> UserDirectory {
        UserDirectory::new(memory_db().await)
    }

    fn alice() -> NewUser {
        NewUser { user_id: 42, username: Some("alice".into()), ..Default::default() }
    }

    #[tokio::test]
    async fn registered_user_reads_back_as_given() {
        let users = directory().await;
        users.register_user(alice()).await.unwrap();

        let user = users.get_user(42).await.unwrap().unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.first_name, None);
        assert_eq!(user.last_name, None);
    }

    #[tokio::test]
    async fn strict_registration_rejects_known_user_id() {
        let users = directory().await;
        users.register_user(alice()).await.unwrap();

        let err = users
            .register_user(NewUser { user_id: 42, username: Some("bob".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUserId(42)));

        let user = users.get_user(42).await.unwrap().unwrap();
        assert_eq!(user.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn user_ids_are_taken_from_the_caller() {
        let users = directory().await;
        let big = i64::MAX - 1;
        let user = users.register_user(NewUser { user_id: big, ..Default::default() }).await.unwrap();
        assert_eq!(user.user_id, big);
    }

    #[tokio::test]
    async fn observing_new_user_creates_the_row() {
        let users = directory().await;
        let profile = UserProfile { first_name: Some("Ana".into()), ..Default::default() };

        let user = users.observe_user(7, profile).await.unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.first_name.as_deref(), Some("Ana"));
        assert_eq!(user.username, None);
    }

    #[tokio::test]
    async fn reobserving_overwrites_only_supplied_fields() {
        let users = directory().await;
        users
            .register_user(NewUser {
                user_id: 42,
                username: Some("alice".into()),
                first_name: Some("Alice".into()),
                last_name: Some("Liddell".into()),
            })
            .await
            .unwrap();

        let profile = UserProfile { username: Some("bob".into()), ..Default::default() };
        let user = users.observe_user(42, profile).await.unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.username.as_deref(), Some("bob"));
        assert_eq!(user.first_name.as_deref(), Some("Alice"));
        assert_eq!(user.last_name.as_deref(), Some("Liddell"));
    }

    #[tokio::test]
    async fn empty_observation_leaves_existing_user_untouched() {
        let users = directory().await;
        users.register_user(alice()).await.unwrap();

        let user = users.observe_user(42, UserProfile::default()).await.unwrap();
        assert_eq!(user.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn profile_fields_may_collide_across_users() {
        let users = directory().await;
        users.register_user(alice()).await.unwrap();
        users
            .register_user(NewUser { user_id: 43, username: Some("alice".into()), ..Default::default() })
            .await
            .unwrap();

        assert!(users.get_user(43).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_registrations_admit_exactly_one() {
        let (_dir, db) = file_db().await;
        let users = UserDirectory::new(db);

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let users = users.clone();
                let username = Some(format!("user{i}"));
                tokio::spawn(async move {
                    users.register_user(NewUser { user_id: 42, username, ..Default::default() }).await
                })
            })
            .collect();

        let mut registered = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => registered += 1,
                Err(StoreError::DuplicateUserId(id)) => assert_eq!(id, 42),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(registered, 1);
    }
}
