use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use gfc_catalog::{Contact, NewContact, Newsletter, Product, ProductDraft, ProductQuery};

use super::r#trait::{CatalogStore, StoreError, SubscribeOutcome};

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    contacts: Vec<Contact>,
    subscribers: Vec<Newsletter>,
    next_product_id: i64,
    next_contact_id: i64,
    next_subscriber_id: i64,
}

/// In-memory catalog store.
///
/// Intended for tests/dev. Uniqueness and reference checks run inside a
/// single write-lock section, which makes every write atomic with
/// respect to its constraints.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn lock_poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;

        let mut items: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        items.sort_by(|a, b| query.compare(a, b));

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let page_size = query.effective_page_size() as usize;
        Ok(items.into_iter().skip(offset).take(page_size).collect())
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn upsert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        draft.validate().map_err(|e| StoreError::Invalid(e.to_string()))?;

        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;

        // `name` is unique across the catalog, independent of the
        // `model_code` upsert key.
        let name_taken = tables
            .products
            .iter()
            .any(|p| p.name == draft.name && p.model_code != draft.model_code);
        if name_taken {
            return Err(StoreError::UniqueViolation("name"));
        }

        let now = Utc::now();
        if let Some(existing) = tables
            .products
            .iter_mut()
            .find(|p| p.model_code == draft.model_code)
        {
            existing.name = draft.name;
            existing.category = draft.category;
            existing.tagline = draft.tagline;
            existing.description = draft.description;
            existing.image_url = draft.image_url;
            existing.image_local = draft.image_local;
            existing.price_pkr = draft.price_pkr;
            existing.price_usd = draft.price_usd;
            existing.specifications = draft.specifications;
            existing.features = draft.features;
            existing.rating = draft.rating;
            existing.review_count = draft.review_count;
            existing.is_active = draft.is_active;
            existing.is_featured = draft.is_featured;
            existing.stock = draft.stock;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let id = next_id(&mut tables.next_product_id);
        let product = Product {
            id,
            model_code: draft.model_code,
            name: draft.name,
            category: draft.category,
            tagline: draft.tagline,
            description: draft.description,
            image_url: draft.image_url,
            image_local: draft.image_local,
            price_pkr: draft.price_pkr,
            price_usd: draft.price_usd,
            specifications: draft.specifications,
            features: draft.features,
            rating: draft.rating,
            review_count: draft.review_count,
            is_active: draft.is_active,
            is_featured: draft.is_featured,
            stock: draft.stock,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;

        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Ok(false);
        }

        // Weak references: clear, never cascade.
        for contact in &mut tables.contacts {
            if contact.product_id == Some(id) {
                contact.product_id = None;
            }
        }
        Ok(true)
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;

        if let Some(product_id) = contact.product_id {
            if !tables.products.iter().any(|p| p.id == product_id) {
                return Err(StoreError::ForeignKeyViolation("product_id"));
            }
        }

        let id = next_id(&mut tables.next_contact_id);
        let stored = Contact {
            id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            subject: contact.subject,
            message: contact.message,
            product_id: contact.product_id,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.contacts.push(stored.clone());
        Ok(stored)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;
        let mut items = tables.contacts.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn mark_contact_read(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;
        match tables.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, StoreError> {
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;

        // Existing rows are left untouched, including soft-unsubscribed
        // ones.
        if tables.subscribers.iter().any(|s| s.email == email) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        let id = next_id(&mut tables.next_subscriber_id);
        let subscription = Newsletter {
            id,
            email: email.to_string(),
            subscribed_at: Utc::now(),
            is_active: true,
        };
        tables.subscribers.push(subscription.clone());
        Ok(SubscribeOutcome::Created(subscription))
    }

    async fn list_subscribers(&self) -> Result<Vec<Newsletter>, StoreError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;
        Ok(tables.subscribers.clone())
    }
}
