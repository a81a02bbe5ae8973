//! Registration-time setup: the user row, its root counter and the default
//! category seed.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    AssetStore, BlobStore, DEFAULT_CATEGORIES, EngineError, NewUser, ResultEngine,
    TransactionCategory, User, attachments::stored_path, categories, users,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Registers a user and creates the root counter in the same unit of
    /// work, so no account ever exists without its root.
    ///
    /// A duplicate username surfaces as the store's uniqueness violation.
    pub async fn setup_new_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let username = normalize_required_name(&new_user.username, "user")?;

        with_tx!(self, |db_tx| {
            // Explicit check for a friendlier error; the unique index on
            // username still backs the invariant under races.
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(username));
            }

            let user = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(new_user.password),
                email: ActiveValue::Set(new_user.email),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            self.root_counter_in(&db_tx, user.id).await?;
            tracing::info!(user_id = user.id, %username, "registered user");
            Ok(user.into())
        })
    }

    /// Username lookup for callers that resolved identity out of band.
    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            Ok(model.into())
        })
    }

    /// One-time per-user category seeding from [`DEFAULT_CATEGORIES`].
    ///
    /// Icon bytes come from the injected asset source and are stored through
    /// the blob store under the user's prefix before any row is written;
    /// entries the user already has are left untouched, so re-running the
    /// setup is harmless.
    pub async fn setup_default_categories(
        &self,
        user_id: i32,
        assets: &dyn AssetStore,
        store: &dyn BlobStore,
    ) -> ResultEngine<Vec<TransactionCategory>> {
        let mut seed = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for (name, asset_ref) in DEFAULT_CATEGORIES {
            let bytes = assets.load(asset_ref)?;
            let reference = stored_path(user_id, asset_ref);
            store.put(&reference, &bytes)?;
            seed.push((*name, reference));
        }

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let mut seeded = Vec::with_capacity(seed.len());
            for (name, icon) in seed {
                let existing = categories::Entity::find()
                    .filter(categories::Column::UserId.eq(user_id))
                    .filter(categories::Column::Name.eq(name))
                    .one(&db_tx)
                    .await?;
                if let Some(model) = existing {
                    seeded.push(model.into());
                    continue;
                }

                let model = categories::ActiveModel {
                    user_id: ActiveValue::Set(user_id),
                    name: ActiveValue::Set(name.to_string()),
                    icon: ActiveValue::Set(Some(icon)),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
                seeded.push(model.into());
            }

            tracing::info!(user_id, count = seeded.len(), "seeded default categories");
            Ok(seeded)
        })
    }
}
