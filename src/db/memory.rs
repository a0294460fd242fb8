//! In-memory store used by router tests. Mirrors the Postgres schema's
//! sequences, unique indexes and foreign keys.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{PublicUser, User},
    },
    categories::repo::{Category, CategoryRepo},
    comments::{repo::CommentRepo, repo_types::Comment},
    complaints::{
        repo::ComplaintRepo,
        repo_types::{
            Complaint, ComplaintFilter, ComplaintUpdate, CreatedComplaint, NewComplaint,
            Priority, SortColumn, SortOrder, Status,
        },
    },
    customers::{repo::CustomerRepo, repo_types::Customer},
    db::{name_fits, StoreError, StoreResult},
};

#[derive(Debug, Clone)]
struct ComplaintRecord {
    id: i64,
    customer_id: i64,
    description: String,
    created_at: OffsetDateTime,
    modified_at: OffsetDateTime,
    created_by_id: i64,
    priority: Priority,
    status: Status,
    category_id: i64,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    comment: String,
    complaint_id: i64,
    created_at: OffsetDateTime,
    created_by_id: i64,
}

#[derive(Default)]
struct Tables {
    last_tick: Option<OffsetDateTime>,
    users: Vec<User>,
    customers: Vec<Customer>,
    categories: Vec<Category>,
    complaints: Vec<ComplaintRecord>,
    comments: Vec<CommentRecord>,
}

impl Tables {
    /// Strictly increasing clock so ordering by timestamp is deterministic.
    fn tick(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let ts = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(ts);
        ts
    }

    fn public_user(&self, id: i64) -> StoreResult<PublicUser> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .map(PublicUser::from)
            .ok_or_else(|| StoreError::Corrupt(format!("user {id} missing")))
    }

    fn comments_for(&self, complaint_id: i64) -> StoreResult<Vec<Comment>> {
        let mut records: Vec<&CommentRecord> = self
            .comments
            .iter()
            .filter(|c| c.complaint_id == complaint_id)
            .collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        records
            .into_iter()
            .map(|c| {
                Ok(Comment {
                    id: c.id,
                    comment: c.comment.clone(),
                    complaint_id: c.complaint_id,
                    created_at: c.created_at,
                    created_by_id: c.created_by_id,
                    created_by: self.public_user(c.created_by_id)?,
                })
            })
            .collect()
    }

    fn hydrate(&self, record: &ComplaintRecord) -> StoreResult<Complaint> {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == record.customer_id)
            .cloned()
            .ok_or_else(|| StoreError::Corrupt("customer missing".into()))?;
        let category = self
            .categories
            .iter()
            .find(|c| c.id == record.category_id)
            .cloned()
            .ok_or_else(|| StoreError::Corrupt("category missing".into()))?;
        Ok(Complaint {
            id: record.id,
            description: record.description.clone(),
            priority: record.priority,
            status: record.status,
            created_at: record.created_at,
            modified_at: record.modified_at,
            customer_id: record.customer_id,
            customer,
            created_by_id: record.created_by_id,
            created_by: self.public_user(record.created_by_id)?,
            category_id: record.category_id,
            category,
            comments: self.comments_for(record.id)?,
        })
    }

    fn has_user(&self, id: i64) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn has_category(&self, id: i64) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    fn check_name(column: &str, name: &str) -> StoreResult<()> {
        if name_fits(name) {
            Ok(())
        } else {
            Err(StoreError::ValueTooLong(column.into()))
        }
    }

    fn insert_customer(&mut self, name: &str) -> Customer {
        let customer = Customer {
            id: self.customers.len() as i64 + 1,
            name: name.to_string(),
            created_at: self.tick(),
        };
        self.customers.push(customer.clone());
        customer
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Insert a user directly, bypassing password hashing.
    pub fn seed_user(&self, email: &str) -> User {
        let mut t = self.lock();
        let user = User {
            id: t.users.len() as i64 + 1,
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password: "!".into(),
            created_at: t.tick(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn seed_category(&self, name: &str) -> i64 {
        let mut t = self.lock();
        let category = Category {
            id: t.categories.len() as i64 + 1,
            name: name.to_string(),
            created_at: t.tick(),
        };
        t.categories.push(category.clone());
        category.id
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn customer_count(&self) -> usize {
        self.lock().customers.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<User> {
        Tables::check_name("users.name", name)?;
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }
        let user = User {
            id: t.users.len() as i64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: t.tick(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl CustomerRepo for MemoryStore {
    async fn create_customer(&self, name: &str) -> StoreResult<Customer> {
        Tables::check_name("customers.name", name)?;
        let mut t = self.lock();
        if t.customers.iter().any(|c| c.name == name) {
            return Err(StoreError::UniqueViolation("customers_name_key".into()));
        }
        Ok(t.insert_customer(name))
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.lock().customers.clone())
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn create_category(&self, name: &str) -> StoreResult<Category> {
        let id = self.seed_category(name);
        let t = self.lock();
        Ok(t.categories[id as usize - 1].clone())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.lock().categories.clone())
    }
}

#[async_trait]
impl ComplaintRepo for MemoryStore {
    async fn create_complaint(&self, new: &NewComplaint) -> StoreResult<CreatedComplaint> {
        Tables::check_name("customers.name", &new.customer_name)?;
        let mut t = self.lock();
        // Every check runs before the first write, like a rolled-back transaction.
        if !t.has_user(new.created_by_id) {
            return Err(StoreError::ForeignKeyViolation("complaints_created_by_id_fkey".into()));
        }
        if !t.has_category(new.category_id) {
            return Err(StoreError::ForeignKeyViolation("complaints_category_id_fkey".into()));
        }
        let customer_id = match t.customers.iter().find(|c| c.name == new.customer_name) {
            Some(existing) => existing.id,
            None => t.insert_customer(&new.customer_name).id,
        };
        let now = t.tick();
        let id = t.complaints.len() as i64 + 1;
        t.complaints.push(ComplaintRecord {
            id,
            customer_id,
            description: new.description.clone(),
            created_at: now,
            modified_at: now,
            created_by_id: new.created_by_id,
            priority: new.priority,
            status: Status::New,
            category_id: new.category_id,
        });
        Ok(CreatedComplaint { id, customer_id })
    }

    async fn update_complaint(&self, id: i64, update: &ComplaintUpdate) -> StoreResult<bool> {
        let mut t = self.lock();
        let Some(index) = t.complaints.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        if !t.has_category(update.category_id) {
            return Err(StoreError::ForeignKeyViolation("complaints_category_id_fkey".into()));
        }
        let now = t.tick();
        let record = &mut t.complaints[index];
        record.description = update.description.clone();
        record.category_id = update.category_id;
        record.priority = update.priority;
        record.modified_at = now;
        Ok(true)
    }

    async fn get_complaint(&self, id: i64) -> StoreResult<Option<Complaint>> {
        let t = self.lock();
        t.complaints
            .iter()
            .find(|c| c.id == id)
            .map(|c| t.hydrate(c))
            .transpose()
    }

    async fn list_complaints(&self, filter: &ComplaintFilter) -> StoreResult<Vec<Complaint>> {
        let t = self.lock();
        let mut records: Vec<&ComplaintRecord> = t
            .complaints
            .iter()
            .filter(|c| filter.user_id.map_or(true, |id| c.created_by_id == id))
            .filter(|c| filter.customer_id.map_or(true, |id| c.customer_id == id))
            .collect();
        records.sort_by_key(|c| {
            let ts = match filter.sort_by {
                SortColumn::CreatedAt => c.created_at,
                SortColumn::ModifiedAt => c.modified_at,
            };
            (ts, c.id)
        });
        if filter.sort_order == SortOrder::Desc {
            records.reverse();
        }
        records.into_iter().map(|c| t.hydrate(c)).collect()
    }

    async fn complaint_exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.lock().complaints.iter().any(|c| c.id == id))
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn create_comment(
        &self,
        complaint_id: i64,
        text: &str,
        author_id: i64,
    ) -> StoreResult<i64> {
        let mut t = self.lock();
        if !t.complaints.iter().any(|c| c.id == complaint_id) {
            return Err(StoreError::ForeignKeyViolation("comments_complaint_id_fkey".into()));
        }
        if !t.has_user(author_id) {
            return Err(StoreError::ForeignKeyViolation("comments_created_by_id_fkey".into()));
        }
        let id = t.comments.len() as i64 + 1;
        let created_at = t.tick();
        t.comments.push(CommentRecord {
            id,
            comment: text.to_string(),
            complaint_id,
            created_at,
            created_by_id: author_id,
        });
        Ok(id)
    }

    async fn list_comments(&self, complaint_ids: &[i64]) -> StoreResult<Vec<Comment>> {
        let t = self.lock();
        let mut out = Vec::new();
        for id in complaint_ids {
            out.extend(t.comments_for(*id)?);
        }
        Ok(out)
    }
}
