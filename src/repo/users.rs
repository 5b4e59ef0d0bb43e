//! User repository over the Users sheet.

use crate::constants::{ADMIN_EMP_ID, USERS_SHEET};
use crate::error::RepoError;
use crate::model::user::{QuotaCategory, User, UserCreateInput, UserRowLayout, UserUpdateInput};
use crate::sheets::client::SheetStore;
use crate::sheets::codec::{self, RowCodec};
use crate::sheets::range;
use crate::utils;
use std::sync::Arc;
use tracing::info;

pub struct UserRepo {
    store: Arc<SheetStore>,
}

impl UserRepo {
    pub fn new(store: Arc<SheetStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = self.store.read_range(USERS_SHEET, None).await?;
        Ok(codec::decode_rows(&rows))
    }

    pub async fn find_by_emp_id(&self, emp_id: &str) -> Result<Option<User>, RepoError> {
        Ok(self.list_all().await?.into_iter().find(|u| u.emp_id == emp_id))
    }

    pub async fn get_by_emp_id(&self, emp_id: &str) -> Result<User, RepoError> {
        self.find_by_emp_id(emp_id)
            .await?
            .ok_or_else(|| RepoError::not_found("User", emp_id))
    }

    pub async fn exists(&self, emp_id: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_emp_id(emp_id).await?.is_some())
    }

    /// Create a user with an empty password; the password is set when the
    /// employee registers.
    pub async fn create(&self, input: UserCreateInput) -> Result<User, RepoError> {
        if self.exists(&input.emp_id).await? {
            return Err(RepoError::Conflict(format!(
                "User with empId {} already exists",
                input.emp_id
            )));
        }

        let user = User {
            emp_id: input.emp_id,
            name: input.name,
            password: String::new(),
            role: input.role,
            leave_quota: input
                .leave_quota
                .unwrap_or(QuotaCategory::Annual.default_quota()),
            sick_leave_quota: input
                .sick_leave_quota
                .unwrap_or(QuotaCategory::Sick.default_quota()),
            personal_leave_quota: input
                .personal_leave_quota
                .unwrap_or(QuotaCategory::Personal.default_quota()),
            maternity_leave_quota: input
                .maternity_leave_quota
                .unwrap_or(QuotaCategory::Maternity.default_quota()),
            sterilization_leave_quota: input
                .sterilization_leave_quota
                .unwrap_or(QuotaCategory::Sterilization.default_quota()),
            unpaid_leave_quota: input
                .unpaid_leave_quota
                .unwrap_or(QuotaCategory::Unpaid.default_quota()),
            compassionate_leave_quota: input
                .compassionate_leave_quota
                .unwrap_or(QuotaCategory::Compassionate.default_quota()),
            is_registered: false,
            created_at: utils::now_rfc3339(),
        };

        self.store.append_rows(USERS_SHEET, &[user.to_row()]).await?;
        info!(emp_id = %user.emp_id, "Created user");
        Ok(user)
    }

    /// Merge partial fields onto the stored record and overwrite its row in
    /// place.
    pub async fn update(&self, emp_id: &str, updates: UserUpdateInput) -> Result<User, RepoError> {
        let users = self.list_all().await?;
        let index = users
            .iter()
            .position(|u| u.emp_id == emp_id)
            .ok_or_else(|| RepoError::not_found("User", emp_id))?;

        let mut user = users[index].clone();
        if let Some(name) = updates.name {
            user.name = name;
        }
        if let Some(password) = updates.password {
            user.password = password;
        }
        if let Some(v) = updates.leave_quota {
            user.leave_quota = v;
        }
        if let Some(v) = updates.sick_leave_quota {
            user.sick_leave_quota = v;
        }
        if let Some(v) = updates.personal_leave_quota {
            user.personal_leave_quota = v;
        }
        if let Some(v) = updates.maternity_leave_quota {
            user.maternity_leave_quota = v;
        }
        if let Some(v) = updates.sterilization_leave_quota {
            user.sterilization_leave_quota = v;
        }
        if let Some(v) = updates.unpaid_leave_quota {
            user.unpaid_leave_quota = v;
        }
        if let Some(v) = updates.compassionate_leave_quota {
            user.compassionate_leave_quota = v;
        }
        if let Some(v) = updates.is_registered {
            user.is_registered = v;
        }

        self.write_at(index, &user).await?;
        Ok(user)
    }

    /// First-time registration: store the (already hashed) password and mark
    /// the user registered.
    pub async fn register(&self, emp_id: &str, password_hash: String) -> Result<User, RepoError> {
        let user = self.get_by_emp_id(emp_id).await?;
        if user.is_registered {
            return Err(RepoError::Conflict(format!(
                "User {emp_id} is already registered"
            )));
        }

        self.update(
            emp_id,
            UserUpdateInput {
                password: Some(password_hash),
                is_registered: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn reset_password(&self, emp_id: &str, password_hash: String) -> Result<(), RepoError> {
        self.update(
            emp_id,
            UserUpdateInput {
                password: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    pub async fn update_quota(
        &self,
        emp_id: &str,
        category: QuotaCategory,
        amount: u32,
    ) -> Result<User, RepoError> {
        let users = self.list_all().await?;
        let index = users
            .iter()
            .position(|u| u.emp_id == emp_id)
            .ok_or_else(|| RepoError::not_found("User", emp_id))?;

        let mut user = users[index].clone();
        user.set_quota(category, amount);
        self.write_at(index, &user).await?;
        Ok(user)
    }

    /// Deduct `days` from a quota, clamping at zero. The stored counter is
    /// never negative.
    pub async fn deduct_quota(
        &self,
        emp_id: &str,
        category: QuotaCategory,
        days: u32,
    ) -> Result<User, RepoError> {
        let user = self.get_by_emp_id(emp_id).await?;
        let remaining = user.quota(category).saturating_sub(days);
        self.update_quota(emp_id, category, remaining).await
    }

    /// Remove a user. The backend has no row-delete-by-key, so this reads
    /// the full sheet, filters in memory and rewrites header plus survivors.
    pub async fn delete(&self, emp_id: &str) -> Result<(), RepoError> {
        if emp_id == ADMIN_EMP_ID {
            return Err(RepoError::Validation(format!(
                "the {ADMIN_EMP_ID} account cannot be deleted"
            )));
        }

        let raw = self.store.read_range(USERS_SHEET, None).await?;
        let users: Vec<User> = codec::decode_rows(&raw);
        if !users.iter().any(|u| u.emp_id == emp_id) {
            return Err(RepoError::not_found("User", emp_id));
        }

        let mut rows = vec![codec::header_row::<User>()];
        rows.extend(
            users
                .iter()
                .filter(|u| u.emp_id != emp_id)
                .map(|u| u.to_row()),
        );

        let write_range = range::block_range(rows.len(), UserRowLayout::CURRENT_WIDTH);
        self.store
            .replace_sheet(USERS_SHEET, raw.len(), &rows, &write_range)
            .await?;
        info!(emp_id, "Deleted user");
        Ok(())
    }

    async fn write_at(&self, index: usize, user: &User) -> Result<(), RepoError> {
        let row_range = range::row_range(
            range::data_row_number(index),
            UserRowLayout::CURRENT_WIDTH,
        );
        self.store
            .write_range(USERS_SHEET, &row_range, &[user.to_row()])
            .await?;
        Ok(())
    }
}
