use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Fallback shown when a 422 response carries no readable message
const GENERIC_VALIDATION_MESSAGE: &str = "Data yang dikirim tidak valid";

// ============================================
// LENIENT FIELD DECODERS
// ============================================

/// Helper function to deserialize null as empty vector
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Money columns arrive either as numbers or as decimal strings ("150000.00")
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).unwrap_or(0.0))
}

fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Labels such as room numbers or RT numbers may be sent as strings or numbers
fn deserialize_optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Anything other than PAID/UNPAID (including null) means "not recorded"
fn deserialize_payment_status<'de, D>(deserializer: D) -> Result<Option<PaymentStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| match s.trim().to_ascii_uppercase().as_str() {
        "PAID" => Some(PaymentStatus::Paid),
        "UNPAID" => Some(PaymentStatus::Unpaid),
        _ => None,
    }))
}

/// Floor configuration is stored as a JSON column and sometimes arrives
/// still encoded as a string ("[4,3,3]")
fn deserialize_floor_config<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(items
        .iter()
        .filter_map(value_to_f64)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u32)
        .collect())
}

fn default_floors() -> u32 {
    1
}

fn value_to_count(value: &Value) -> Option<u32> {
    value_to_f64(value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
}

/// Room and floor counts, sent as numbers or numeric strings ("10")
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_count).unwrap_or(0))
}

fn deserialize_floor_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_count)
        .unwrap_or_else(default_floors))
}

// ============================================
// AUTH & PROFILE
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Warga,
    #[serde(alias = "ADMIN_RT", alias = "rt")]
    AdminRt,
    #[serde(alias = "ADMIN_RW", alias = "rw")]
    AdminRw,
    #[serde(alias = "pemilik_kos", alias = "juragan_kost")]
    PemilikKost,
    #[serde(alias = "admin")]
    SuperAdmin,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Warga => "Warga",
            Role::AdminRt => "Pengurus RT",
            Role::AdminRw => "Pengurus RW",
            Role::PemilikKost => "Pemilik Kost",
            Role::SuperAdmin => "Super Admin",
            Role::Other => "Pengguna",
        }
    }

    /// Neighborhood administrators (cash book, patrol roster, store verification)
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::AdminRt | Role::AdminRw | Role::SuperAdmin)
    }

    /// Roles allowed to record kost payments and deposits
    pub fn manages_kost(&self) -> bool {
        matches!(self, Role::PemilikKost | Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub rt: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub rw: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpVerification {
    #[serde(default, alias = "token")]
    pub reset_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub password: String,
    pub password_confirmation: String,
}

// ============================================
// DASHBOARD & ANNOUNCEMENTS
// ============================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Author {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "user")]
    pub author: Option<Author>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, alias = "likes")]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default, alias = "liked")]
    pub is_liked: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LikeOutcome {
    #[serde(default, alias = "liked")]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub likes_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WargaDashboard {
    #[serde(default)]
    pub unpaid_bills_count: u32,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub unpaid_bills_total: f64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub kas_balance: Option<f64>,
    #[serde(default)]
    pub active_polls_count: u32,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub latest_announcements: Vec<Announcement>,
    #[serde(default)]
    pub next_ronda: Option<RondaSchedule>,
}

// ============================================
// BOARDING HOUSES (KOST)
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    #[default]
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "nonaktif", alias = "INACTIVE")]
    Nonaktif,
    #[serde(alias = "moved_out")]
    MovedOut,
    #[serde(other)]
    Other,
}

impl TenantStatus {
    /// Tenants who no longer occupy their room
    pub fn is_inactive(&self) -> bool {
        matches!(self, TenantStatus::Nonaktif | TenantStatus::MovedOut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Tenant {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub status: TenantStatus,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_payment_status")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub rent_amount: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub deposit_amount: Option<f64>,
    #[serde(default)]
    pub deposit_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BoardingHouse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_rooms: u32,
    #[serde(default = "default_floors", deserialize_with = "deserialize_floor_count")]
    pub total_floors: u32,
    #[serde(default, deserialize_with = "deserialize_floor_config")]
    pub floor_config: Vec<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub monthly_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tenants: Vec<Tenant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBoardingHouse {
    pub name: String,
    pub address: String,
    pub total_rooms: u32,
    pub total_floors: u32,
    pub floor_config: Vec<u32>,
    pub monthly_price: f64,
}

/// What happens to a tenant's deposit when they move out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositAction {
    Refund,
    Forfeit,
}

impl DepositAction {
    pub fn label(&self) -> &'static str {
        match self {
            DepositAction::Refund => "Kembalikan deposit",
            DepositAction::Forfeit => "Hanguskan deposit",
        }
    }
}

// ============================================
// KAS RT
// ============================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KasAccount {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub balance: f64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KasSummary {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub balance: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_income: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_expense: f64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub accounts: Vec<KasAccount>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KasTransaction {
    pub id: u64,
    #[serde(default, rename = "type")]
    pub kind: String, // "income", "expense", "transfer"
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "transaction_date")]
    pub date: Option<String>,
}

impl KasTransaction {
    pub fn is_expense(&self) -> bool {
        self.kind.eq_ignore_ascii_case("expense")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KasTransferRequest {
    pub from_account_id: u64,
    pub to_account_id: u64,
    pub amount: f64,
    pub description: String,
}

// ============================================
// MARKETPLACE
// ============================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub price: f64,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub store: Option<StoreRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub store_id: u64,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Store {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "verified")]
    pub is_verified: bool,
    #[serde(default)]
    pub owner: Option<Author>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewStore {
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
}

// ============================================
// RONDA
// ============================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RondaMember {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attendance: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RondaSchedule {
    pub id: u64,
    #[serde(default, alias = "schedule_date")]
    pub date: Option<String>,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "users", deserialize_with = "deserialize_null_default")]
    pub members: Vec<RondaMember>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRondaSchedule {
    pub date: String,
    pub shift: String,
    pub location: String,
    pub user_ids: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RondaFine {
    pub id: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Everything the Ronda screen shows, fetched together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RondaOverview {
    pub today: Vec<RondaSchedule>,
    pub mine: Vec<RondaSchedule>,
    pub unpaid_fines: Vec<RondaFine>,
}

// ============================================
// POLLS
// ============================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PollOption {
    pub id: u64,
    #[serde(default, alias = "option_text", alias = "text")]
    pub label: String,
    #[serde(default, alias = "votes")]
    pub votes_count: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Poll {
    pub id: u64,
    #[serde(alias = "question")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub has_voted: bool,
    #[serde(default)]
    pub user_vote_option_id: Option<u64>,
    #[serde(default)]
    pub ends_at: Option<String>,
}

impl Poll {
    pub fn total_votes(&self) -> u32 {
        self.options.iter().map(|o| o.votes_count).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPoll {
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub ends_at: String,
}

// ============================================
// BANSOS
// ============================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BansosRecipient {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub nik: Option<String>,
    #[serde(default, alias = "bansos_type")]
    pub program: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub distributed_at: Option<String>,
}

impl BansosRecipient {
    pub fn is_distributed(&self) -> bool {
        self.distributed_at.is_some()
            || self
                .status
                .as_deref()
                .map(|s| s.eq_ignore_ascii_case("distributed") || s.eq_ignore_ascii_case("disalurkan"))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBansosRecipient {
    pub name: String,
    pub nik: String,
    pub program: String,
    pub address: String,
}

// ============================================
// ENVELOPE
// ============================================

/// Result of a write endpoint: only the server's message matters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
}

/// List payloads are either a bare array or a paginator object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Plain(Vec<T>),
    Paged(Page<T>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Plain(items) => items,
            ListPayload::Paged(page) => page.data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

fn default_success() -> bool {
    true
}

/// First message of a Laravel-style `errors` object (`{ field: [messages] }`)
pub fn first_validation_message(errors: &Value) -> Option<String> {
    match errors {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_validation_message),
        Value::Object(fields) => fields.values().find_map(first_validation_message),
        _ => None,
    }
}

fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<Envelope<T>> {
    if !(200..300).contains(&status) {
        let raw: Option<Envelope<Value>> = serde_json::from_str(body).ok();
        let message = raw.as_ref().and_then(|e| e.message.clone());

        return Err(match status {
            401 => ApiError::Unauthorized { message },
            422 => ApiError::Validation {
                message: raw
                    .as_ref()
                    .and_then(|e| e.errors.as_ref())
                    .and_then(first_validation_message)
                    .or(message)
                    .unwrap_or_else(|| GENERIC_VALIDATION_MESSAGE.to_string()),
            },
            _ => ApiError::Rejected { status, message },
        });
    }

    if body.trim().is_empty() {
        return Ok(Envelope {
            success: true,
            data: None,
            message: None,
            errors: None,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(ApiError::Rejected {
            status,
            message: envelope.message,
        });
    }

    Ok(envelope)
}

/// Decode a `{ success, data, message }` response whose data is required
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    parse_envelope::<T>(status, body)?
        .data
        .ok_or(ApiError::MissingData)
}

/// Decode a response whose data may legitimately be absent
pub fn decode_optional<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<Option<T>> {
    Ok(parse_envelope::<T>(status, body)?.data)
}

/// Decode a write endpoint response, keeping only the message
pub fn decode_ack(status: u16, body: &str) -> ApiResult<Ack> {
    let envelope = parse_envelope::<Value>(status, body)?;
    Ok(Ack {
        message: envelope.message,
    })
}

// ============================================
// CLIENT
// ============================================

/// REST client for the neighborhood API
///
/// Clones share the bearer token, so a login performed through one clone is
/// seen by the background service's clone.
#[derive(Clone)]
pub struct WargaClient {
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    client: Client,
}

impl WargaClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
            client: Client::new(),
        }
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");

        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }

    async fn send_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> ApiResult<Option<T>> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_optional(status, &body)
    }

    async fn send_ack(&self, builder: RequestBuilder) -> ApiResult<Ack> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_ack(status, &body)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let payload: ListPayload<T> = self.send(self.request(Method::GET, path)).await?;
        Ok(payload.into_vec())
    }

    // ---------- auth ----------

    pub async fn login_demo(&self, role: &str) -> ApiResult<AuthSession> {
        let body = serde_json::json!({ "role": role });
        self.send(self.request(Method::POST, "/auth/login/demo-mobile").json(&body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<Ack> {
        let body = serde_json::json!({ "email": email });
        self.send_ack(self.request(Method::POST, "/auth/forgot-password").json(&body))
            .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResult<OtpVerification> {
        let body = serde_json::json!({ "email": email, "otp": otp });
        let verification = self
            .send_optional(self.request(Method::POST, "/auth/verify-otp").json(&body))
            .await?;
        Ok(verification.unwrap_or_default())
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/auth/reset-password").json(request))
            .await
    }

    pub async fn me(&self) -> ApiResult<UserProfile> {
        self.send(self.request(Method::GET, "/auth/me")).await
    }

    pub async fn logout(&self) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/auth/logout")).await
    }

    // ---------- dashboard & announcements ----------

    pub async fn dashboard(&self) -> ApiResult<WargaDashboard> {
        self.send(self.request(Method::GET, "/warga/dashboard")).await
    }

    pub async fn announcements(&self) -> ApiResult<Vec<Announcement>> {
        self.fetch_list("/announcements").await
    }

    pub async fn like_announcement(&self, announcement_id: u64) -> ApiResult<LikeOutcome> {
        let path = format!("/announcements/{}/like", announcement_id);
        let outcome = self
            .send_optional(self.request(Method::POST, &path))
            .await?;
        Ok(outcome.unwrap_or_default())
    }

    pub async fn comments(&self, announcement_id: u64) -> ApiResult<Vec<Comment>> {
        self.fetch_list(&format!("/announcements/{}/comments", announcement_id))
            .await
    }

    pub async fn add_comment(&self, announcement_id: u64, content: &str) -> ApiResult<Ack> {
        let path = format!("/announcements/{}/comments", announcement_id);
        let body = serde_json::json!({ "content": content });
        self.send_ack(self.request(Method::POST, &path).json(&body))
            .await
    }

    // ---------- boarding houses ----------

    pub async fn boarding_houses(&self) -> ApiResult<Vec<BoardingHouse>> {
        self.fetch_list("/boarding-houses").await
    }

    pub async fn boarding_house(&self, house_id: u64) -> ApiResult<BoardingHouse> {
        let path = format!("/boarding-houses/{}", house_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn create_boarding_house(&self, house: &NewBoardingHouse) -> ApiResult<BoardingHouse> {
        self.send(self.request(Method::POST, "/boarding-houses").json(house))
            .await
    }

    pub async fn pay_rent(&self, house_id: u64, tenant_id: u64) -> ApiResult<Ack> {
        let path = format!("/boarding-houses/{}/tenants/{}/pay", house_id, tenant_id);
        self.send_ack(self.request(Method::POST, &path)).await
    }

    pub async fn pay_deposit(&self, house_id: u64, tenant_id: u64) -> ApiResult<Ack> {
        let path = format!(
            "/boarding-houses/{}/tenants/{}/pay-deposit",
            house_id, tenant_id
        );
        self.send_ack(self.request(Method::POST, &path)).await
    }

    pub async fn process_deposit(
        &self,
        house_id: u64,
        tenant_id: u64,
        action: DepositAction,
    ) -> ApiResult<Ack> {
        let path = format!(
            "/boarding-houses/{}/tenants/{}/process-deposit",
            house_id, tenant_id
        );
        let body = serde_json::json!({ "action": action });
        self.send_ack(self.request(Method::POST, &path).json(&body))
            .await
    }

    // ---------- kas ----------

    pub async fn kas_summary(&self) -> ApiResult<KasSummary> {
        self.send(self.request(Method::GET, "/rt/kas/summary")).await
    }

    pub async fn kas_transactions(&self, page: Option<u32>) -> ApiResult<Vec<KasTransaction>> {
        let mut path = "/rt/kas/transactions".to_string();
        if let Some(page) = page {
            path.push_str(&format!("?page={}", page));
        }
        self.fetch_list(&path).await
    }

    pub async fn kas_transfer(&self, transfer: &KasTransferRequest) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/rt/kas/transfer").json(transfer))
            .await
    }

    // ---------- marketplace ----------

    pub async fn products(&self, search: Option<&str>) -> ApiResult<Vec<Product>> {
        let mut path = "/products".to_string();
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            path.push_str(&format!("?search={}", urlencoding::encode(search.trim())));
        }
        self.fetch_list(&path).await
    }

    pub async fn create_product(&self, product: &NewProduct, image: Option<&Path>) -> ApiResult<Ack> {
        let mut form = Form::new()
            .text("store_id", product.store_id.to_string())
            .text("name", product.name.clone())
            .text("price", product.price.to_string())
            .text("stock", product.stock.to_string())
            .text("description", product.description.clone());

        if let Some(path) = image {
            form = form.part("image", file_part(path).await?);
        }

        self.send_ack(self.request(Method::POST, "/products").multipart(form))
            .await
    }

    pub async fn stores(&self) -> ApiResult<Vec<Store>> {
        self.fetch_list("/stores").await
    }

    pub async fn create_store(&self, store: &NewStore) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/stores").json(store))
            .await
    }

    pub async fn verify_store(&self, store_id: u64) -> ApiResult<Ack> {
        let path = format!("/admin/stores/{}/verify", store_id);
        self.send_ack(self.request(Method::POST, &path)).await
    }

    // ---------- ronda ----------

    pub async fn ronda_schedules(&self) -> ApiResult<Vec<RondaSchedule>> {
        self.fetch_list("/ronda-schedules").await
    }

    pub async fn ronda_today(&self) -> ApiResult<Vec<RondaSchedule>> {
        self.fetch_list("/ronda-schedules/today").await
    }

    pub async fn my_ronda_schedule(&self) -> ApiResult<Vec<RondaSchedule>> {
        self.fetch_list("/ronda-schedules/my-schedule").await
    }

    pub async fn unpaid_ronda_fines(&self) -> ApiResult<Vec<RondaFine>> {
        self.fetch_list("/ronda-fines/my-unpaid").await
    }

    /// Today's roster, the user's own shifts and unpaid fines, fetched in parallel
    ///
    /// Fails as a whole when any of the three requests fails.
    pub async fn ronda_overview(&self) -> ApiResult<RondaOverview> {
        let (today, mine, unpaid_fines) = tokio::try_join!(
            self.ronda_today(),
            self.my_ronda_schedule(),
            self.unpaid_ronda_fines()
        )?;

        Ok(RondaOverview {
            today,
            mine,
            unpaid_fines,
        })
    }

    pub async fn create_ronda_schedule(&self, schedule: &NewRondaSchedule) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/ronda-schedules").json(schedule))
            .await
    }

    pub async fn assign_ronda(&self, schedule_id: u64, user_ids: &[u64]) -> ApiResult<Ack> {
        let path = format!("/ronda-schedules/{}/assign", schedule_id);
        let body = serde_json::json!({ "user_ids": user_ids });
        self.send_ack(self.request(Method::POST, &path).json(&body))
            .await
    }

    // ---------- polls ----------

    pub async fn polls(&self) -> ApiResult<Vec<Poll>> {
        self.fetch_list("/polls").await
    }

    pub async fn create_poll(&self, poll: &NewPoll) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/polls").json(poll))
            .await
    }

    pub async fn vote(&self, poll_id: u64, option_id: u64) -> ApiResult<Ack> {
        let path = format!("/polls/{}/vote", poll_id);
        let body = serde_json::json!({ "option_id": option_id });
        self.send_ack(self.request(Method::POST, &path).json(&body))
            .await
    }

    // ---------- bansos ----------

    pub async fn bansos_recipients(&self) -> ApiResult<Vec<BansosRecipient>> {
        self.fetch_list("/bansos-recipients").await
    }

    pub async fn create_bansos_recipient(&self, recipient: &NewBansosRecipient) -> ApiResult<Ack> {
        self.send_ack(self.request(Method::POST, "/bansos-recipients").json(recipient))
            .await
    }

    pub async fn update_bansos_recipient(
        &self,
        recipient_id: u64,
        recipient: &NewBansosRecipient,
    ) -> ApiResult<Ack> {
        let path = format!("/bansos-recipients/{}", recipient_id);
        self.send_ack(self.request(Method::PUT, &path).json(recipient))
            .await
    }

    pub async fn delete_bansos_recipient(&self, recipient_id: u64) -> ApiResult<Ack> {
        let path = format!("/bansos-recipients/{}", recipient_id);
        self.send_ack(self.request(Method::DELETE, &path)).await
    }

    /// Mark aid as handed over, optionally attaching a photo as evidence
    pub async fn distribute_bansos(
        &self,
        recipient_id: u64,
        notes: Option<&str>,
        evidence_photo: Option<&Path>,
    ) -> ApiResult<Ack> {
        let path = format!("/bansos-recipients/{}/distribute", recipient_id);

        let mut form = Form::new();
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            form = form.text("notes", notes.trim().to_string());
        }
        if let Some(photo) = evidence_photo {
            form = form.part("evidence_photo", file_part(photo).await?);
        }

        self.send_ack(self.request(Method::POST, &path).multipart(form))
            .await
    }
}

/// Read a local image into a multipart part, guessing its MIME type
async fn file_part(path: &Path) -> ApiResult<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_list() {
        let body = r#"{"success":true,"data":[{"id":1,"name":"Kost Melati"}],"message":"ok"}"#;
        let payload: ListPayload<BoardingHouse> = decode_envelope(200, body).unwrap();
        let houses = payload.into_vec();
        assert_eq!(houses.len(), 1);
        assert_eq!(houses[0].name, "Kost Melati");
        assert_eq!(houses[0].total_floors, 1);
    }

    #[test]
    fn test_decode_paginated_list() {
        let body = r#"{"success":true,"data":{"current_page":1,"last_page":3,"data":[{"id":7,"title":"Kerja bakti"}]}}"#;
        let payload: ListPayload<Announcement> = decode_envelope(200, body).unwrap();
        let items = payload.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kerja bakti");
        assert_eq!(items[0].likes_count, 0);
    }

    #[test]
    fn test_success_false_is_rejected() {
        let body = r#"{"success":false,"data":null,"message":"Tagihan sudah lunas"}"#;
        let err = decode_ack(200, body).unwrap_err();
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message.as_deref(), Some("Tagihan sudah lunas"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_401_is_unauthorized() {
        let err = decode_envelope::<UserProfile>(401, r#"{"message":"Unauthenticated."}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Unauthorized { message: Some(ref m) } if m == "Unauthenticated."
        ));
    }

    #[test]
    fn test_422_uses_first_validation_message() {
        let body = r#"{
            "success": false,
            "message": "The given data was invalid.",
            "errors": {
                "nik": ["NIK harus 16 digit"],
                "name": ["Nama wajib diisi"]
            }
        }"#;
        let err = decode_ack(422, body).unwrap_err();
        match err {
            ApiError::Validation { message } => assert_eq!(message, "NIK harus 16 digit"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_422_without_errors_falls_back_to_message() {
        let err = decode_ack(422, r#"{"message":"Password tidak cocok"}"#).unwrap_err();
        assert_eq!(err.server_message(), Some("Password tidak cocok"));

        let err = decode_ack(422, "not json").unwrap_err();
        assert_eq!(err.server_message(), Some(GENERIC_VALIDATION_MESSAGE));
    }

    #[test]
    fn test_non_json_server_error() {
        let err = decode_ack(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Rejected {
                status: 502,
                message: None
            }
        ));
    }

    #[test]
    fn test_missing_data() {
        let err = decode_envelope::<UserProfile>(200, r#"{"success":true,"data":null}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingData));

        let optional = decode_optional::<LikeOutcome>(200, r#"{"success":true}"#).unwrap();
        assert!(optional.is_none());
    }

    #[test]
    fn test_empty_body_ack() {
        assert_eq!(decode_ack(204, "").unwrap(), Ack::default());
    }

    #[test]
    fn test_tenant_lenient_fields() {
        let body = r#"{
            "id": 3,
            "name": "Budi",
            "room_number": 5,
            "status": "MOVED_OUT",
            "payment_status": null,
            "rent_amount": "750000.00",
            "due_date": "2024-02-01"
        }"#;
        let tenant: Tenant = serde_json::from_str(body).unwrap();
        assert_eq!(tenant.room_number.as_deref(), Some("5"));
        assert_eq!(tenant.status, TenantStatus::MovedOut);
        assert_eq!(tenant.payment_status, None);
        assert_eq!(tenant.rent_amount, Some(750000.0));
    }

    #[test]
    fn test_tenant_unknown_status_and_payment() {
        let body = r#"{"id":4,"status":"PENDING","payment_status":"PARTIAL"}"#;
        let tenant: Tenant = serde_json::from_str(body).unwrap();
        assert_eq!(tenant.status, TenantStatus::Other);
        assert!(!tenant.status.is_inactive());
        assert_eq!(tenant.payment_status, None);

        let body = r#"{"id":5,"payment_status":"paid"}"#;
        let tenant: Tenant = serde_json::from_str(body).unwrap();
        assert_eq!(tenant.status, TenantStatus::Active);
        assert_eq!(tenant.payment_status, Some(PaymentStatus::Paid));
    }

    #[test]
    fn test_floor_config_as_string_or_array() {
        let house: BoardingHouse =
            serde_json::from_str(r#"{"id":1,"name":"A","floor_config":"[4,3,3]"}"#).unwrap();
        assert_eq!(house.floor_config, vec![4, 3, 3]);

        let house: BoardingHouse =
            serde_json::from_str(r#"{"id":1,"name":"A","floor_config":[5,"2"]}"#).unwrap();
        assert_eq!(house.floor_config, vec![5, 2]);

        let house: BoardingHouse =
            serde_json::from_str(r#"{"id":1,"name":"A","floor_config":null}"#).unwrap();
        assert!(house.floor_config.is_empty());
    }

    #[test]
    fn test_house_counts_accept_numeric_strings() {
        let house: BoardingHouse = serde_json::from_str(
            r#"{"id":1,"name":"A","total_rooms":"10","total_floors":"3"}"#,
        )
        .unwrap();
        assert_eq!(house.total_rooms, 10);
        assert_eq!(house.total_floors, 3);

        let house: BoardingHouse = serde_json::from_str(
            r#"{"id":1,"name":"A","total_rooms":null,"total_floors":"dua"}"#,
        )
        .unwrap();
        assert_eq!(house.total_rooms, 0);
        assert_eq!(house.total_floors, 1);

        let house: BoardingHouse = serde_json::from_str(r#"{"id":1,"name":"A"}"#).unwrap();
        assert_eq!(house.total_floors, 1);
    }

    #[test]
    fn test_role_aliases() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":1,"name":"Pak RT","role":"admin_rt","rt":3}"#).unwrap();
        assert_eq!(profile.role, Role::AdminRt);
        assert!(profile.role.is_admin());
        assert_eq!(profile.rt.as_deref(), Some("3"));

        let profile: UserProfile =
            serde_json::from_str(r#"{"id":2,"name":"Bu Sri","role":"bendahara"}"#).unwrap();
        assert_eq!(profile.role, Role::Other);
        assert!(!profile.role.is_admin());
    }

    #[test]
    fn test_auth_session_access_token_alias() {
        let session: AuthSession = serde_json::from_str(
            r#"{"access_token":"abc","user":{"id":9,"name":"Demo"}}"#,
        )
        .unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user.role, Role::Warga);
    }

    #[test]
    fn test_client_shares_token_between_clones() {
        let client = WargaClient::new("http://localhost:8000/api/".to_string());
        assert_eq!(client.base_url(), "http://localhost:8000/api");

        let worker_copy = client.clone();
        client.set_token(Some("secret".to_string()));
        assert_eq!(worker_copy.token().as_deref(), Some("secret"));

        worker_copy.set_token(None);
        assert!(client.token().is_none());
    }
}
