//! In-memory stand-ins for the tables, the identity provider and object storage,
//! plus request helpers for driving the router.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tarladan_api::error::{IdentityError, StorageError};
use tarladan_api::model::{
    commission_percent, marketplace_price, remaining_stock, ActivityStatus, Farmer, FarmerCertificate, FarmerChanges, FarmerId,
    FarmerImage, IncomeEntry, NewFarmer, NewProduct, OrderLineView, OrderProduct, OrderProductId,
    OrderProductStatus, Preparation, Product, ProductChanges, ProductId, StoreActivity,
};
use tarladan_api::platform::{IdentityProvider, IdentityUser, ObjectStorage, Session};
use tarladan_api::store::{FarmerRepo, MarketStore, OrderRepo, ProductRepo};
use tarladan_api::{app, AppError, AppState, Settings};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    farmers: Vec<Farmer>,
    products: Vec<Product>,
    lines: Vec<OrderProduct>,
    images: Vec<FarmerImage>,
    certificates: Vec<FarmerCertificate>,
    income: Vec<IncomeEntry>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    next_id: AtomicI64,
    /// Number of farmer lookups by identity subject.
    pub auth_lookups: AtomicUsize,
    pub fail_farmer_insert: AtomicBool,
}

impl MemoryStore {
    fn id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.tables.lock().unwrap().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn farmer(&self, id: FarmerId) -> Option<Farmer> {
        self.tables.lock().unwrap().farmers.iter().find(|f| f.farmer_id == id).cloned()
    }

    pub fn farmer_count(&self) -> usize {
        self.tables.lock().unwrap().farmers.len()
    }

    pub fn line(&self, id: OrderProductId) -> Option<OrderProduct> {
        self.tables.lock().unwrap().lines.iter().find(|l| l.order_product_id == id).cloned()
    }

    pub fn income_rows(&self) -> Vec<IncomeEntry> {
        self.tables.lock().unwrap().income.clone()
    }

    pub fn images(&self) -> Vec<FarmerImage> {
        self.tables.lock().unwrap().images.clone()
    }

    pub fn certificates(&self) -> Vec<FarmerCertificate> {
        self.tables.lock().unwrap().certificates.clone()
    }

    /// Insert an order line item for `product`, as the checkout side would.
    pub fn seed_line(&self, product: &Product, farmer: &Farmer, quantity: i32, status: OrderProductStatus) -> OrderProduct {
        let unit_price = product.tarladan_price;
        let line = OrderProduct {
            order_product_id: self.id(),
            order_id: self.id(),
            product_id: product.id,
            farmer_id: farmer.farmer_id,
            farmer_name: format!("{} {}", farmer.farmer_name, farmer.farmer_last_name),
            unit_quantity: quantity,
            unit_price,
            total_product_price: unit_price * Decimal::from(quantity),
            order_product_rate: None,
            delivery_address_id: None,
            product_name: product.product_name.clone(),
            order_product_status: status,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().lines.push(line.clone());
        line
    }
}

fn apply_farmer_changes(changes: &FarmerChanges, farmer: &mut Farmer) {
    fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
        if let Some(v) = value {
            *slot = v.clone();
        }
    }
    set(&mut farmer.farmer_name, &changes.farmer_name);
    set(&mut farmer.farmer_last_name, &changes.farmer_last_name);
    set(&mut farmer.farmer_age, &changes.farmer_age);
    set(&mut farmer.farmer_address, &changes.farmer_address);
    set(&mut farmer.farmer_city, &changes.farmer_city);
    set(&mut farmer.farmer_town, &changes.farmer_town);
    set(&mut farmer.farmer_neighbourhood, &changes.farmer_neighbourhood);
    set(&mut farmer.farmer_phone_number, &changes.farmer_phone_number);
    set(&mut farmer.farm_name, &changes.farm_name);
    if changes.imgurl.is_some() {
        farmer.imgurl = changes.imgurl.clone();
    }
}

/// Mirrors the COALESCE update in the Postgres store. The price is checked by the caller.
fn apply_product_changes(changes: &ProductChanges, product: &mut Product) {
    if let Some(v) = &changes.product_name {
        product.product_name = v.clone();
    }
    if let Some(v) = &changes.product_katalog_name {
        product.product_katalog_name = v.clone();
    }
    if let Some(price) = changes.farmer_price {
        product.farmer_price = price;
        if let Ok(derived) = marketplace_price(price) {
            product.tarladan_price = derived;
        }
    }
    if let Some(v) = changes.stock_quantity {
        product.stock_quantity = v;
    }
    if let Some(v) = &changes.image_url {
        product.image_url = Some(v.clone());
    }
}

#[async_trait]
impl FarmerRepo for MemoryStore {
    async fn insert_farmer(&self, new: &NewFarmer) -> Result<Farmer, AppError> {
        if self.fail_farmer_insert.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        let farmer = Farmer {
            farmer_id: self.id(),
            auth_id: new.auth_id,
            farmer_name: new.farmer_name.clone(),
            farmer_last_name: new.farmer_last_name.clone(),
            farmer_age: new.farmer_age,
            farmer_address: new.farmer_address.clone(),
            farmer_city: new.farmer_city.clone(),
            farmer_town: new.farmer_town.clone(),
            farmer_neighbourhood: new.farmer_neighbourhood.clone(),
            farmer_phone_number: new.farmer_phone_number.clone(),
            farmer_mail: new.farmer_mail.clone(),
            farmer_activity_status: new.farmer_activity_status,
            farm_name: new.farm_name.clone(),
            farmer_tc_no: new.farmer_tc_no.clone(),
            imgurl: new.imgurl.clone(),
            farmer_biografi: None,
            store_activity: StoreActivity::Nonactive,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().farmers.push(farmer.clone());
        Ok(farmer)
    }

    async fn farmer_by_id(&self, id: FarmerId) -> Result<Option<Farmer>, AppError> {
        Ok(self.farmer(id))
    }

    async fn farmer_by_auth_id(&self, auth_id: Uuid) -> Result<Option<Farmer>, AppError> {
        self.auth_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().unwrap().farmers.iter().find(|f| f.auth_id == auth_id).cloned())
    }

    async fn update_farmer(&self, id: FarmerId, changes: &FarmerChanges) -> Result<Option<Farmer>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.farmers.iter_mut().find(|f| f.farmer_id == id).map(|f| {
            apply_farmer_changes(changes, f);
            f.clone()
        }))
    }

    async fn set_biography(&self, id: FarmerId, biography: &str) -> Result<Option<Farmer>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.farmers.iter_mut().find(|f| f.farmer_id == id).map(|f| {
            f.farmer_biografi = Some(biography.to_string());
            f.clone()
        }))
    }

    async fn set_store_activity(&self, id: FarmerId, activity: StoreActivity) -> Result<Option<Farmer>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.farmers.iter_mut().find(|f| f.farmer_id == id).map(|f| {
            f.store_activity = activity;
            f.clone()
        }))
    }

    async fn delete_farmer(&self, id: FarmerId) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.farmers.len();
        t.farmers.retain(|f| f.farmer_id != id);
        Ok(t.farmers.len() < before)
    }

    async fn insert_image(&self, farmer_id: FarmerId, file_path: &str, image_url: &str) -> Result<FarmerImage, AppError> {
        let image = FarmerImage {
            id: self.id(),
            farmer_id,
            file_path: file_path.to_string(),
            image_url: image_url.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().images.push(image.clone());
        Ok(image)
    }

    async fn images_for(&self, farmer_id: FarmerId) -> Result<Vec<FarmerImage>, AppError> {
        Ok(self.images().into_iter().filter(|i| i.farmer_id == farmer_id).rev().collect())
    }

    async fn image_by_id(&self, id: i64) -> Result<Option<FarmerImage>, AppError> {
        Ok(self.images().into_iter().find(|i| i.id == id))
    }

    async fn delete_image(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.images.len();
        t.images.retain(|i| i.id != id);
        Ok(t.images.len() < before)
    }

    async fn insert_certificate(
        &self,
        farmer_id: FarmerId,
        file_path: &str,
        certificate_url: &str,
    ) -> Result<FarmerCertificate, AppError> {
        let certificate = FarmerCertificate {
            id: self.id(),
            farmer_id,
            file_path: file_path.to_string(),
            certificate_url: certificate_url.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().certificates.push(certificate.clone());
        Ok(certificate)
    }

    async fn certificates_for(&self, farmer_id: FarmerId) -> Result<Vec<FarmerCertificate>, AppError> {
        Ok(self.certificates().into_iter().filter(|c| c.farmer_id == farmer_id).rev().collect())
    }

    async fn certificate_by_id(&self, id: i64) -> Result<Option<FarmerCertificate>, AppError> {
        Ok(self.certificates().into_iter().find(|c| c.id == id))
    }

    async fn delete_certificate(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.certificates.len();
        t.certificates.retain(|c| c.id != id);
        Ok(t.certificates.len() < before)
    }
}

#[async_trait]
impl ProductRepo for MemoryStore {
    async fn insert_product(&self, new: &NewProduct) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: self.id(),
            farmer_id: new.farmer_id,
            product_name: new.product_name.clone(),
            product_katalog_name: new.product_katalog_name.clone(),
            farmer_price: new.farmer_price,
            tarladan_commission: commission_percent(),
            tarladan_price: new.tarladan_price()?,
            stock_quantity: new.stock_quantity,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().products.push(product.clone());
        Ok(product)
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, AppError> {
        Ok(self.product(id))
    }

    async fn products_by_farmer(&self, farmer_id: FarmerId) -> Result<Vec<Product>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products.iter().filter(|p| p.farmer_id == farmer_id).rev().cloned().collect())
    }

    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> Result<Option<Product>, AppError> {
        changes.tarladan_price()?;
        let mut t = self.tables.lock().unwrap();
        Ok(t.products.iter_mut().find(|p| p.id == id).map(|p| {
            apply_product_changes(changes, p);
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        Ok(t.products.len() < before)
    }
}

#[async_trait]
impl OrderRepo for MemoryStore {
    async fn lines_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<OrderLineView>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.lines
            .iter()
            .rev()
            .filter(|l| l.farmer_id == farmer_id)
            .map(|l| {
                let product = t.products.iter().find(|p| p.id == l.product_id);
                OrderLineView {
                    line: l.clone(),
                    product_image_url: product.and_then(|p| p.image_url.clone()),
                    product_description: product.map(|p| p.product_katalog_name.clone()),
                }
            })
            .collect())
    }

    async fn line_by_id(&self, id: OrderProductId) -> Result<Option<OrderProduct>, AppError> {
        Ok(self.line(id))
    }

    async fn set_line_status(
        &self,
        id: OrderProductId,
        status: OrderProductStatus,
    ) -> Result<Option<OrderProduct>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.lines.iter_mut().find(|l| l.order_product_id == id).map(|l| {
            l.order_product_status = status;
            l.clone()
        }))
    }

    async fn complete_preparation(
        &self,
        line: &OrderProduct,
        status: OrderProductStatus,
    ) -> Result<Preparation, AppError> {
        let income_id = self.id();
        let mut t = self.tables.lock().unwrap();
        let current = t
            .lines
            .iter_mut()
            .find(|l| l.order_product_id == line.order_product_id)
            .ok_or_else(|| AppError::NotFound(format!("order product {}", line.order_product_id)))?;
        let from = current.order_product_status;
        if !from.can_transition_to(status) || !from.books_income_on(status) {
            return Err(AppError::Conflict("already moved".into()));
        }
        current.order_product_status = status;
        let updated = current.clone();

        let income = IncomeEntry {
            income_id,
            order_prduct_id: updated.order_product_id,
            product_id: updated.product_id,
            farmer_id: updated.farmer_id,
            farmer_name: updated.farmer_name.clone(),
            product_name: updated.product_name.clone(),
            product_quantity: updated.unit_quantity,
            product_income: updated.total_product_price,
            created_at: Utc::now(),
        };
        t.income.push(income.clone());

        let remaining = t.products.iter_mut().find(|p| p.id == updated.product_id).map(|p| {
            p.stock_quantity = remaining_stock(p.stock_quantity, updated.unit_quantity);
            p.stock_quantity
        });
        Ok(Preparation {
            line: updated,
            income,
            remaining_stock: remaining,
        })
    }

    async fn income_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<IncomeEntry>, AppError> {
        Ok(self.income_rows().into_iter().filter(|i| i.farmer_id == farmer_id).rev().collect())
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Issue an unsigned token carrying `sub` and `email`, shaped like the provider's.
pub fn token_for(sub: Uuid, email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({ "sub": sub, "email": email }).to_string());
    format!("{}.{}.signature", header, payload)
}

struct Account {
    id: Uuid,
    password: String,
}

#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    pub deleted: Mutex<Vec<Uuid>>,
    pub reset_requests: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn add_account(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        id
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser, IdentityError> {
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(IdentityError::AlreadyRegistered);
        }
        let id = self.add_account(email, password);
        Ok(IdentityUser {
            id,
            email: Some(email.to_string()),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(a) if a.password == password => Ok(Session {
                access_token: token_for(a.id, email),
                token_type: "bearer".into(),
                expires_in: 3600,
                refresh_token: Some("refresh".into()),
                user: IdentityUser {
                    id: a.id,
                    email: Some(email.to_string()),
                },
            }),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        self.reset_requests.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        self.accounts.lock().unwrap().retain(|_, a| a.id != user_id);
        self.deleted.lock().unwrap().push(user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<BTreeMap<(String, String), (Bytes, String)>>,
    signed: AtomicUsize,
    pub fail_uploads: AtomicBool,
}

impl FakeStorage {
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn put(&self, bucket: &str, key: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.into(), key.into()), (Bytes::from_static(b"x"), "image/png".into()));
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Upload {
                bucket: bucket.into(),
                key: key.into(),
                message: "unavailable".into(),
            });
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.into(), key.into()), (body, content_type.into()));
        Ok(())
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(&(bucket.to_string(), key.clone()));
        }
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.keys(bucket).into_iter().filter(|k| k.starts_with(prefix)).collect())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("https://storage.test/public/{}/{}", bucket, key)
    }

    async fn signed_url(&self, bucket: &str, key: &str) -> Result<String, StorageError> {
        let n = self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://storage.test/sign/{}/{}?token={}", bucket, key, n))
    }
}

pub fn test_settings() -> Settings {
    let env = HashMap::from([
        ("SUPABASE_URL", "https://demo.supabase.test"),
        ("SUPABASE_KEY", "anon"),
        ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ("DATABASE_URL", "postgres://localhost/tarladan_test"),
        ("STORAGE_ACCESS_KEY_ID", "ak"),
        ("STORAGE_SECRET_ACCESS_KEY", "sk"),
    ]);
    Settings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
    pub storage: Arc<FakeStorage>,
}

/// A farmer with a working login.
pub struct SeededFarmer {
    pub farmer: Farmer,
    pub token: String,
    pub email: String,
    pub password: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let identity = Arc::new(FakeIdentity::default());
        let storage = Arc::new(FakeStorage::default());
        let state = AppState::new(store.clone(), identity.clone(), storage.clone(), test_settings());
        TestApp {
            router: app(state),
            store,
            identity,
            storage,
        }
    }

    pub async fn seed_farmer(&self, name: &str, status: ActivityStatus) -> SeededFarmer {
        let email = format!("{}@tarladan.test", name);
        let password = "secret123".to_string();
        let auth_id = self.identity.add_account(&email, &password);
        let farmer = self
            .store
            .insert_farmer(&NewFarmer {
                auth_id,
                farmer_name: name.to_string(),
                farmer_last_name: "Yılmaz".into(),
                farmer_age: 40,
                farmer_address: "Köy yolu 1".into(),
                farmer_city: "İzmir".into(),
                farmer_town: "Tire".into(),
                farmer_neighbourhood: "Merkez".into(),
                farmer_phone_number: "+90 555 111 22 33".into(),
                farmer_mail: email.clone(),
                farmer_activity_status: status,
                farm_name: format!("{} Çiftliği", name),
                farmer_tc_no: "12345678901".into(),
                imgurl: None,
            })
            .await
            .unwrap();
        SeededFarmer {
            token: token_for(auth_id, &email),
            farmer,
            email,
            password,
        }
    }

    pub async fn seed_product(&self, farmer: &Farmer, price: i64, stock: i32) -> Product {
        self.store
            .insert_product(&NewProduct {
                farmer_id: farmer.farmer_id,
                product_name: "Domates".into(),
                product_katalog_name: "Sofralık domates".into(),
                farmer_price: Decimal::from(price),
                stock_quantity: stock,
            })
            .await
            .unwrap()
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).unwrap()
}

const BOUNDARY: &str = "tarladan-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
        self.buf.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        builder.body(Body::from(self.buf)).unwrap()
    }
}
