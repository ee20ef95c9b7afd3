//! Shared types for the Model
//!
//! These types are used across multiple sub-models and represent
//! fundamental domain concepts.

use std::time::Instant;

use crate::api::DepositAction;

/// Vim command state for tracking double-key commands like 'gg'
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VimCommandState {
    None,
    WaitingForSecondG, // First 'g' pressed, waiting for second 'g'
}

/// Data a screen fetches from the server
///
/// Used as the dedupe key of the request queue and for loading indicators.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    Profile,
    Dashboard,
    Announcements,
    Comments(u64),
    BoardingHouses,
    BoardingHouse(u64),
    Ronda,
    Kas,
    Polls,
    Bansos,
    Market { search: Option<String> },
}

impl LoadTarget {
    pub fn label(&self) -> &'static str {
        match self {
            LoadTarget::Profile => "profil",
            LoadTarget::Dashboard => "beranda",
            LoadTarget::Announcements => "pengumuman",
            LoadTarget::Comments(_) => "komentar",
            LoadTarget::BoardingHouses => "daftar kost",
            LoadTarget::BoardingHouse(_) => "detail kost",
            LoadTarget::Ronda => "jadwal ronda",
            LoadTarget::Kas => "kas RT",
            LoadTarget::Polls => "voting",
            LoadTarget::Bansos => "penerima bansos",
            LoadTarget::Market { .. } => "pasar",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

/// Which half of the Pasar screen has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PasarPane {
    #[default]
    Products,
    Stores,
}

impl PasarPane {
    pub fn toggle(self) -> Self {
        match self {
            PasarPane::Products => PasarPane::Stores,
            PasarPane::Stores => PasarPane::Products,
        }
    }
}

/// An action waiting for a y/n answer
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmAction {
    PayRent {
        house_id: u64,
        tenant_id: u64,
        tenant_name: String,
    },
    PayDeposit {
        house_id: u64,
        tenant_id: u64,
        tenant_name: String,
    },
    ProcessDeposit {
        house_id: u64,
        tenant_id: u64,
        tenant_name: String,
        action: DepositAction,
    },
    AssignRonda {
        schedule_id: u64,
        user_ids: Vec<u64>,
        schedule_label: String,
    },
    Vote {
        poll_id: u64,
        option_id: u64,
        option_label: String,
    },
    DeleteBansos {
        recipient_id: u64,
        name: String,
    },
    VerifyStore {
        store_id: u64,
        name: String,
    },
    Logout,
}

impl ConfirmAction {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmAction::PayRent { .. } => "Catat Pembayaran",
            ConfirmAction::PayDeposit { .. } => "Catat Deposit",
            ConfirmAction::ProcessDeposit { .. } => "Proses Deposit",
            ConfirmAction::AssignRonda { .. } => "Jadwal Ronda",
            ConfirmAction::Vote { .. } => "Kirim Suara",
            ConfirmAction::DeleteBansos { .. } => "Hapus Penerima",
            ConfirmAction::VerifyStore { .. } => "Verifikasi Toko",
            ConfirmAction::Logout => "Keluar",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::PayRent { tenant_name, .. } => {
                format!("Catat pembayaran sewa untuk {}?", tenant_name)
            }
            ConfirmAction::PayDeposit { tenant_name, .. } => {
                format!("Catat pembayaran deposit untuk {}?", tenant_name)
            }
            ConfirmAction::ProcessDeposit {
                tenant_name,
                action,
                ..
            } => format!("{} milik {}?", action.label(), tenant_name),
            ConfirmAction::AssignRonda { schedule_label, .. } => {
                format!("Daftarkan ke ronda {}?", schedule_label)
            }
            ConfirmAction::Vote { option_label, .. } => {
                format!("Pilih \"{}\"? Suara tidak bisa diubah.", option_label)
            }
            ConfirmAction::DeleteBansos { name, .. } => {
                format!("Hapus {} dari daftar penerima bansos?", name)
            }
            ConfirmAction::VerifyStore { name, .. } => format!("Verifikasi toko {}?", name),
            ConfirmAction::Logout => "Keluar dari akun ini?".to_string(),
        }
    }
}

/// What a text form submits to
#[derive(Clone, Debug, PartialEq)]
pub enum FormKind {
    Login,
    ForgotPassword,
    VerifyOtp {
        email: String,
    },
    ResetPassword {
        email: String,
        otp: String,
        reset_token: Option<String>,
    },
    Comment {
        announcement_id: u64,
    },
    KasTransfer,
    BansosRecipient {
        editing: Option<u64>,
    },
    DistributeBansos {
        recipient_id: u64,
    },
    CreateBoardingHouse,
    CreateRondaSchedule,
    CreatePoll,
    CreateStore,
    CreateProduct,
    ProductSearch,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Login => "Masuk",
            FormKind::ForgotPassword => "Lupa Password",
            FormKind::VerifyOtp { .. } => "Verifikasi OTP",
            FormKind::ResetPassword { .. } => "Password Baru",
            FormKind::Comment { .. } => "Tulis Komentar",
            FormKind::KasTransfer => "Transfer Kas",
            FormKind::BansosRecipient { editing: None } => "Tambah Penerima Bansos",
            FormKind::BansosRecipient { editing: Some(_) } => "Ubah Penerima Bansos",
            FormKind::DistributeBansos { .. } => "Salurkan Bansos",
            FormKind::CreateBoardingHouse => "Tambah Kost",
            FormKind::CreateRondaSchedule => "Buat Jadwal Ronda",
            FormKind::CreatePoll => "Buat Voting",
            FormKind::CreateStore => "Buka Toko",
            FormKind::CreateProduct => "Tambah Produk",
            FormKind::ProductSearch => "Cari Produk",
        }
    }

    /// Field labels; labels starting with '*' are masked
    fn field_labels(&self) -> &'static [&'static str] {
        match self {
            FormKind::Login => &["Email", "*Password"],
            FormKind::ForgotPassword => &["Email"],
            FormKind::VerifyOtp { .. } => &["Kode OTP"],
            FormKind::ResetPassword { .. } => &["*Password baru", "*Ulangi password"],
            FormKind::Comment { .. } => &["Komentar"],
            FormKind::KasTransfer => &[
                "ID akun asal",
                "ID akun tujuan",
                "Jumlah (Rp)",
                "Keterangan",
            ],
            FormKind::BansosRecipient { .. } => &["Nama", "NIK", "Program", "Alamat"],
            FormKind::DistributeBansos { .. } => &["Catatan", "Foto bukti (path, opsional)"],
            FormKind::CreateBoardingHouse => &[
                "Nama kost",
                "Alamat",
                "Jumlah kamar",
                "Jumlah lantai",
                "Kamar per lantai (mis. 4,3,3)",
                "Harga per bulan (Rp)",
            ],
            FormKind::CreateRondaSchedule => &[
                "Tanggal (YYYY-MM-DD)",
                "Shift",
                "Lokasi",
                "ID warga (pisah koma)",
            ],
            FormKind::CreatePoll => &[
                "Judul",
                "Deskripsi",
                "Pilihan (pisah koma)",
                "Berakhir (YYYY-MM-DD)",
            ],
            FormKind::CreateStore => &["Nama toko", "Deskripsi", "Alamat", "Telepon"],
            FormKind::CreateProduct => &[
                "ID toko",
                "Nama produk",
                "Harga (Rp)",
                "Stok",
                "Deskripsi",
                "Foto (path, opsional)",
            ],
            FormKind::ProductSearch => &["Kata kunci"],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub secret: bool,
}

/// A modal text form
#[derive(Clone, Debug, PartialEq)]
pub struct InputForm {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl InputForm {
    pub fn new(kind: FormKind) -> Self {
        let fields = kind
            .field_labels()
            .iter()
            .map(|label| match label.strip_prefix('*') {
                Some(masked) => FormField {
                    label: masked.to_string(),
                    value: String::new(),
                    secret: true,
                },
                None => FormField {
                    label: label.to_string(),
                    value: String::new(),
                    secret: false,
                },
            })
            .collect();

        Self {
            kind,
            fields,
            focused: 0,
        }
    }

    /// Pre-fill field values in order
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (field, value) in self.fields.iter_mut().zip(values) {
            field.value = value.into();
        }
        self
    }

    /// Trimmed value of a field ("" when out of range)
    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.trim()).unwrap_or("")
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn is_last_field(&self) -> bool {
        self.focused + 1 >= self.fields.len()
    }
}

/// What picking an option in an [`OptionPicker`] does
#[derive(Clone, Debug, PartialEq)]
pub enum PickerPurpose {
    DemoRole,
    DepositAction {
        house_id: u64,
        tenant_id: u64,
        tenant_name: String,
    },
    PollOption {
        poll_id: u64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PickerOption {
    pub id: u64,
    pub key: String,
    pub label: String,
}

/// Modal list of choices
#[derive(Clone, Debug, PartialEq)]
pub struct OptionPicker {
    pub title: String,
    pub purpose: PickerPurpose,
    pub options: Vec<PickerOption>,
    pub selected: Option<usize>,
}

impl OptionPicker {
    pub fn new(title: impl Into<String>, purpose: PickerPurpose, options: Vec<PickerOption>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Self {
            title: title.into(),
            purpose,
            options,
            selected,
        }
    }

    pub fn selected_option(&self) -> Option<&PickerOption> {
        self.selected.and_then(|idx| self.options.get(idx))
    }
}
