//! Room status derivation
//!
//! A room's status is never stored. It is recomputed from the tenant record
//! and the current date every time the grid is drawn. The checks run in a
//! fixed order and the first match wins:
//!
//! 1. no tenant → `Empty`
//! 2. tenant status `NONAKTIF` / `MOVED_OUT` → `Nonaktif`
//! 3. start date after today → `BelumAktif`
//! 4. effective payment status `UNPAID` → `BelumBayar`
//! 5. due date before today → `Tunggakan`
//! 6. due date within the next [`DUE_SOON_WINDOW_DAYS`] days → `JatuhTempo`
//! 7. otherwise → `Lunas`

use chrono::NaiveDate;

use crate::api::{PaymentStatus, Tenant};
use crate::logic::dates::{days_until, parse_optional_date};

/// A paid room whose due date is at most this many days away is "due soon"
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    Empty,
    Nonaktif,
    BelumAktif,
    BelumBayar,
    Tunggakan,
    JatuhTempo,
    Lunas,
}

impl RoomStatus {
    /// Legend order
    pub const ALL: [RoomStatus; 7] = [
        RoomStatus::Empty,
        RoomStatus::Nonaktif,
        RoomStatus::BelumAktif,
        RoomStatus::BelumBayar,
        RoomStatus::Tunggakan,
        RoomStatus::JatuhTempo,
        RoomStatus::Lunas,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Empty => "Kosong",
            RoomStatus::Nonaktif => "Nonaktif",
            RoomStatus::BelumAktif => "Belum Aktif",
            RoomStatus::BelumBayar => "Belum Bayar",
            RoomStatus::Tunggakan => "Tunggakan",
            RoomStatus::JatuhTempo => "Jatuh Tempo",
            RoomStatus::Lunas => "Lunas",
        }
    }

    /// Wire-style code (`EMPTY`, `BELUM_BAYAR`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            RoomStatus::Empty => "EMPTY",
            RoomStatus::Nonaktif => "NONAKTIF",
            RoomStatus::BelumAktif => "BELUM_AKTIF",
            RoomStatus::BelumBayar => "BELUM_BAYAR",
            RoomStatus::Tunggakan => "TUNGGAKAN",
            RoomStatus::JatuhTempo => "JATUH_TEMPO",
            RoomStatus::Lunas => "LUNAS",
        }
    }

    /// Single glyph drawn in the room cell
    pub fn badge(&self) -> &'static str {
        match self {
            RoomStatus::Empty => "·",
            RoomStatus::Nonaktif => "×",
            RoomStatus::BelumAktif => "○",
            RoomStatus::BelumBayar => "$",
            RoomStatus::Tunggakan => "!",
            RoomStatus::JatuhTempo => "⏰",
            RoomStatus::Lunas => "✓",
        }
    }

    /// Statuses that need the owner's attention
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            RoomStatus::BelumBayar | RoomStatus::Tunggakan | RoomStatus::JatuhTempo
        )
    }
}

/// Resolve the payment status of a tenant
///
/// An explicit `PAID`/`UNPAID` from the server wins. Without one, a due date
/// that lies after the record's creation means a payment already pushed the
/// due date forward, so the tenant counts as paid. A due date without a
/// creation date also counts as paid. Anything else is unpaid.
///
/// # Examples
/// ```
/// use wargatui::api::{PaymentStatus, Tenant};
/// use wargatui::logic::room_status::effective_payment_status;
///
/// let mut tenant: Tenant = serde_json::from_str(r#"{"id": 1}"#).unwrap();
/// assert_eq!(effective_payment_status(&tenant), PaymentStatus::Unpaid);
///
/// tenant.due_date = Some("2024-02-01".into());
/// tenant.created_at = Some("2024-01-01T08:00:00Z".into());
/// assert_eq!(effective_payment_status(&tenant), PaymentStatus::Paid);
///
/// tenant.payment_status = Some(PaymentStatus::Unpaid);
/// assert_eq!(effective_payment_status(&tenant), PaymentStatus::Unpaid);
/// ```
pub fn effective_payment_status(tenant: &Tenant) -> PaymentStatus {
    if let Some(explicit) = tenant.payment_status {
        return explicit;
    }

    let due = parse_optional_date(tenant.due_date.as_deref());
    let created = parse_optional_date(tenant.created_at.as_deref());

    match (due, created) {
        (Some(due), Some(created)) if due > created => PaymentStatus::Paid,
        (Some(_), None) => PaymentStatus::Paid,
        _ => PaymentStatus::Unpaid,
    }
}

/// Derive the status of a room from its tenant (if any) and today's date
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use wargatui::api::Tenant;
/// use wargatui::logic::room_status::{derive_room_status, RoomStatus};
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(derive_room_status(None, today), RoomStatus::Empty);
///
/// let tenant: Tenant = serde_json::from_str(r#"{
///     "id": 1,
///     "status": "ACTIVE",
///     "start_date": "2024-01-01",
///     "due_date": "2024-01-01",
///     "payment_status": null,
///     "created_at": "2023-12-01"
/// }"#).unwrap();
/// assert_eq!(derive_room_status(Some(&tenant), today), RoomStatus::JatuhTempo);
/// ```
pub fn derive_room_status(tenant: Option<&Tenant>, today: NaiveDate) -> RoomStatus {
    let tenant = match tenant {
        Some(t) => t,
        None => return RoomStatus::Empty,
    };

    if tenant.status.is_inactive() {
        return RoomStatus::Nonaktif;
    }

    if let Some(start) = parse_optional_date(tenant.start_date.as_deref()) {
        if start > today {
            return RoomStatus::BelumAktif;
        }
    }

    if effective_payment_status(tenant) == PaymentStatus::Unpaid {
        return RoomStatus::BelumBayar;
    }

    match parse_optional_date(tenant.due_date.as_deref()) {
        Some(due) => match days_until(today, due) {
            d if d < 0 => RoomStatus::Tunggakan,
            d if d <= DUE_SOON_WINDOW_DAYS => RoomStatus::JatuhTempo,
            _ => RoomStatus::Lunas,
        },
        None => RoomStatus::Lunas,
    }
}

/// Count rooms per status, in legend order, skipping statuses with no rooms
pub fn tally<I>(statuses: I) -> Vec<(RoomStatus, usize)>
where
    I: IntoIterator<Item = RoomStatus>,
{
    let mut counts = [0usize; RoomStatus::ALL.len()];
    for status in statuses {
        if let Some(idx) = RoomStatus::ALL.iter().position(|s| *s == status) {
            counts[idx] += 1;
        }
    }

    RoomStatus::ALL
        .iter()
        .zip(counts.iter())
        .filter(|(_, count)| **count > 0)
        .map(|(status, count)| (*status, *count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TenantStatus;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tenant() -> Tenant {
        Tenant {
            id: 1,
            name: "Sari".to_string(),
            phone: None,
            room_number: Some("1".to_string()),
            status: TenantStatus::Active,
            start_date: Some("2023-06-01".to_string()),
            due_date: None,
            payment_status: Some(PaymentStatus::Paid),
            created_at: Some("2023-06-01T09:00:00Z".to_string()),
            rent_amount: None,
            deposit_amount: None,
            deposit_status: None,
        }
    }

    #[test]
    fn test_unknown_tenant_status_is_treated_as_active() {
        let mut t = tenant();
        t.status = TenantStatus::Other;
        t.due_date = Some("2024-03-01".to_string());
        assert_eq!(derive_room_status(Some(&t), ymd(2024, 1, 1)), RoomStatus::Lunas);
    }

    #[test]
    fn test_unparseable_start_date_is_ignored() {
        let mut t = tenant();
        t.start_date = Some("segera".to_string());
        t.due_date = Some("2024-03-01".to_string());
        assert_eq!(derive_room_status(Some(&t), ymd(2024, 1, 1)), RoomStatus::Lunas);
    }

    #[test]
    fn test_start_today_is_active() {
        let mut t = tenant();
        t.start_date = Some("2024-01-01T00:00:00.000000Z".to_string());
        t.due_date = Some("2024-02-01".to_string());
        assert_eq!(derive_room_status(Some(&t), ymd(2024, 1, 1)), RoomStatus::Lunas);
    }

    #[test]
    fn test_paid_without_due_date_is_lunas() {
        let t = tenant();
        assert_eq!(derive_room_status(Some(&t), ymd(2024, 1, 1)), RoomStatus::Lunas);
    }

    #[test]
    fn test_due_before_creation_is_unpaid() {
        let mut t = tenant();
        t.payment_status = None;
        t.created_at = Some("2024-01-10".to_string());
        t.due_date = Some("2024-01-05".to_string());
        assert_eq!(effective_payment_status(&t), PaymentStatus::Unpaid);
        assert_eq!(
            derive_room_status(Some(&t), ymd(2024, 1, 1)),
            RoomStatus::BelumBayar
        );
    }

    #[test]
    fn test_due_on_creation_day_is_unpaid() {
        let mut t = tenant();
        t.payment_status = None;
        t.created_at = Some("2024-01-05T07:00:00Z".to_string());
        t.due_date = Some("2024-01-05".to_string());
        assert_eq!(effective_payment_status(&t), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_unparseable_due_date_counts_as_absent() {
        let mut t = tenant();
        t.payment_status = None;
        t.created_at = None;
        t.due_date = Some("bulan depan".to_string());
        assert_eq!(effective_payment_status(&t), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_unparseable_created_at_counts_as_absent() {
        let mut t = tenant();
        t.payment_status = None;
        t.created_at = Some("??".to_string());
        t.due_date = Some("2024-01-05".to_string());
        assert_eq!(effective_payment_status(&t), PaymentStatus::Paid);
    }

    #[test]
    fn test_tally_in_legend_order() {
        let counts = tally(vec![
            RoomStatus::Lunas,
            RoomStatus::Empty,
            RoomStatus::Lunas,
            RoomStatus::Tunggakan,
        ]);
        assert_eq!(
            counts,
            vec![
                (RoomStatus::Empty, 1),
                (RoomStatus::Tunggakan, 1),
                (RoomStatus::Lunas, 2),
            ]
        );
        assert!(tally(Vec::new()).is_empty());
    }

    #[test]
    fn test_labels_and_codes() {
        assert_eq!(RoomStatus::JatuhTempo.label(), "Jatuh Tempo");
        assert_eq!(RoomStatus::BelumAktif.code(), "BELUM_AKTIF");
        assert!(RoomStatus::Tunggakan.needs_attention());
        assert!(!RoomStatus::Lunas.needs_attention());
    }
}
