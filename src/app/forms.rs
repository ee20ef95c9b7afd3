//! Turning submitted forms into requests
//!
//! Values are checked only as far as building a request needs (numbers,
//! id lists). Everything else is left to the server, whose 422 message is
//! shown as-is.

use crate::api::{
    KasTransferRequest, NewBansosRecipient, NewBoardingHouse, NewPoll, NewProduct,
    NewRondaSchedule, NewStore, ResetPasswordRequest,
};
use crate::logic::dates::parse_local_date;
use crate::model::{FormKind, InputForm};
use crate::services::{ApiRequest, Mutation};
use crate::utils::{optional_path, parse_amount, parse_id_list, split_list};
use crate::App;

/// What a valid form turns into
#[derive(Debug)]
enum Submission {
    Request(ApiRequest),
    Mutation(Mutation),
    Comment { announcement_id: u64, content: String },
    Search(String),
}

fn required<'a>(form: &'a InputForm, idx: usize) -> Result<&'a str, String> {
    let value = form.value(idx);
    if value.is_empty() {
        let label = form.fields.get(idx).map(|f| f.label.as_str()).unwrap_or("Isian");
        return Err(format!("{} wajib diisi", label));
    }
    Ok(value)
}

fn amount(form: &InputForm, idx: usize) -> Result<f64, String> {
    let raw = required(form, idx)?;
    parse_amount(raw).ok_or_else(|| format!("Jumlah tidak valid: {}", raw))
}

fn number<T: std::str::FromStr>(form: &InputForm, idx: usize) -> Result<T, String> {
    let raw = required(form, idx)?;
    raw.parse()
        .map_err(|_| format!("Angka tidak valid: {}", raw))
}

fn date(form: &InputForm, idx: usize) -> Result<String, String> {
    let raw = required(form, idx)?;
    parse_local_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| format!("Tanggal tidak valid: {} (YYYY-MM-DD)", raw))
}

fn build(form: &InputForm) -> Result<Submission, String> {
    let text = |idx: usize| form.value(idx).to_string();

    Ok(match &form.kind {
        FormKind::Login => Submission::Request(ApiRequest::Login {
            email: required(form, 0)?.to_string(),
            password: required(form, 1)?.to_string(),
        }),
        FormKind::ForgotPassword => Submission::Request(ApiRequest::ForgotPassword {
            email: required(form, 0)?.to_string(),
        }),
        FormKind::VerifyOtp { email } => Submission::Request(ApiRequest::VerifyOtp {
            email: email.clone(),
            otp: required(form, 0)?.to_string(),
        }),
        FormKind::ResetPassword {
            email,
            otp,
            reset_token,
        } => {
            let password = required(form, 0)?.to_string();
            let confirmation = required(form, 1)?.to_string();
            if password != confirmation {
                return Err("Konfirmasi password tidak sama".to_string());
            }
            Submission::Request(ApiRequest::ResetPassword(ResetPasswordRequest {
                email: email.clone(),
                otp: otp.clone(),
                token: reset_token.clone(),
                password,
                password_confirmation: confirmation,
            }))
        }
        FormKind::Comment { announcement_id } => Submission::Comment {
            announcement_id: *announcement_id,
            content: required(form, 0)?.to_string(),
        },
        FormKind::KasTransfer => {
            let from_account_id: u64 = number(form, 0)?;
            let to_account_id: u64 = number(form, 1)?;
            if from_account_id == to_account_id {
                return Err("Akun asal dan tujuan harus berbeda".to_string());
            }
            Submission::Mutation(Mutation::KasTransfer(KasTransferRequest {
                from_account_id,
                to_account_id,
                amount: amount(form, 2)?,
                description: text(3),
            }))
        }
        FormKind::BansosRecipient { editing } => Submission::Mutation(Mutation::SaveBansos {
            editing: *editing,
            recipient: NewBansosRecipient {
                name: required(form, 0)?.to_string(),
                nik: text(1),
                program: text(2),
                address: text(3),
            },
        }),
        FormKind::DistributeBansos { recipient_id } => {
            let evidence_photo = optional_path(form.value(1));
            if let Some(path) = &evidence_photo {
                if !path.is_file() {
                    return Err(format!("File tidak ditemukan: {}", path.display()));
                }
            }
            Submission::Mutation(Mutation::DistributeBansos {
                recipient_id: *recipient_id,
                notes: text(0),
                evidence_photo,
            })
        }
        FormKind::CreateBoardingHouse => {
            let floor_config = match form.value(4) {
                "" => Vec::new(),
                raw => parse_id_list(raw)
                    .map(|ids| ids.into_iter().map(|n| n as u32).collect())
                    .ok_or_else(|| format!("Kamar per lantai tidak valid: {}", raw))?,
            };
            Submission::Mutation(Mutation::CreateBoardingHouse(NewBoardingHouse {
                name: required(form, 0)?.to_string(),
                address: text(1),
                total_rooms: number(form, 2)?,
                total_floors: number(form, 3)?,
                floor_config,
                monthly_price: amount(form, 5)?,
            }))
        }
        FormKind::CreateRondaSchedule => {
            let user_ids = parse_id_list(form.value(3))
                .ok_or_else(|| format!("ID warga tidak valid: {}", form.value(3)))?;
            Submission::Mutation(Mutation::CreateRondaSchedule(NewRondaSchedule {
                date: date(form, 0)?,
                shift: required(form, 1)?.to_string(),
                location: text(2),
                user_ids,
            }))
        }
        FormKind::CreatePoll => {
            let options = split_list(form.value(2));
            if options.len() < 2 {
                return Err("Voting membutuhkan minimal dua pilihan".to_string());
            }
            Submission::Mutation(Mutation::CreatePoll(NewPoll {
                title: required(form, 0)?.to_string(),
                description: text(1),
                options,
                ends_at: date(form, 3)?,
            }))
        }
        FormKind::CreateStore => Submission::Mutation(Mutation::CreateStore(NewStore {
            name: required(form, 0)?.to_string(),
            description: text(1),
            address: text(2),
            phone: text(3),
        })),
        FormKind::CreateProduct => {
            let image = optional_path(form.value(5));
            if let Some(path) = &image {
                if !path.is_file() {
                    return Err(format!("File tidak ditemukan: {}", path.display()));
                }
            }
            Submission::Mutation(Mutation::CreateProduct {
                product: NewProduct {
                    store_id: number(form, 0)?,
                    name: required(form, 1)?.to_string(),
                    price: amount(form, 2)?,
                    stock: number(form, 3)?,
                    description: text(4),
                },
                image,
            })
        }
        FormKind::ProductSearch => Submission::Search(text(0)),
    })
}

impl App {
    /// Submit the open form
    ///
    /// An invalid form stays open with an error toast so it can be fixed.
    pub(crate) fn submit_form(&mut self) {
        let Some(form) = self.model.ui.input_form.take() else {
            return;
        };

        let submission = match build(&form) {
            Ok(submission) => submission,
            Err(message) => {
                tracing::debug!(form = form.kind.title(), reason = %message, "form rejected");
                self.model.ui.show_error(message);
                self.model.ui.input_form = Some(form);
                return;
            }
        };

        match submission {
            Submission::Request(ApiRequest::Login { email, password }) => {
                self.login(email, password)
            }
            Submission::Request(request) => self.send(request),
            Submission::Mutation(mutation) => self.mutate(mutation),
            Submission::Comment {
                announcement_id,
                content,
            } => self.post_comment(announcement_id, content),
            Submission::Search(keyword) => self.search_products(&keyword),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::app::testing::Harness;

    fn form(kind: FormKind, values: &[&str]) -> InputForm {
        InputForm::new(kind).with_values(values.iter().copied())
    }

    #[test]
    fn test_login_requires_both_fields() {
        let err = build(&form(FormKind::Login, &["budi@example.id", ""])).unwrap_err();
        assert_eq!(err, "Password wajib diisi");
    }

    #[test]
    fn test_reset_password_must_match() {
        let kind = FormKind::ResetPassword {
            email: "a@b.id".into(),
            otp: "123456".into(),
            reset_token: Some("rt".into()),
        };
        assert!(build(&form(kind.clone(), &["rahasia1", "rahasia2"])).is_err());

        match build(&form(kind, &["rahasia1", "rahasia1"])).unwrap() {
            Submission::Request(ApiRequest::ResetPassword(request)) => {
                assert_eq!(request.otp, "123456");
                assert_eq!(request.token.as_deref(), Some("rt"));
            }
            other => panic!("unexpected submission {:?}", other),
        }
    }

    #[test]
    fn test_kas_transfer_parses_amount() {
        match build(&form(FormKind::KasTransfer, &["1", "2", "Rp 250.000", "Iuran 17an"])).unwrap()
        {
            Submission::Mutation(Mutation::KasTransfer(transfer)) => {
                assert_eq!(transfer.amount, 250000.0);
                assert_eq!(transfer.description, "Iuran 17an");
            }
            other => panic!("unexpected submission {:?}", other),
        }

        let err = build(&form(FormKind::KasTransfer, &["1", "1", "5000", ""])).unwrap_err();
        assert_eq!(err, "Akun asal dan tujuan harus berbeda");
    }

    #[test]
    fn test_boarding_house_floor_config() {
        let values = ["Kost Mawar", "Jl. Kenanga 3", "10", "3", "4, 3,3", "750.000"];
        match build(&form(FormKind::CreateBoardingHouse, &values)).unwrap() {
            Submission::Mutation(Mutation::CreateBoardingHouse(house)) => {
                assert_eq!(house.floor_config, vec![4, 3, 3]);
                assert_eq!(house.total_rooms, 10);
                assert_eq!(house.monthly_price, 750000.0);
            }
            other => panic!("unexpected submission {:?}", other),
        }

        let values = ["Kost Mawar", "", "sepuluh", "3", "", "750000"];
        assert!(build(&form(FormKind::CreateBoardingHouse, &values)).is_err());
    }

    #[test]
    fn test_ronda_schedule_normalizes_date() {
        let values = ["2024-08-17T00:00:00", "malam", "Pos 1", "3, 4"];
        match build(&form(FormKind::CreateRondaSchedule, &values)).unwrap() {
            Submission::Mutation(Mutation::CreateRondaSchedule(schedule)) => {
                assert_eq!(schedule.date, "2024-08-17");
                assert_eq!(schedule.user_ids, vec![3, 4]);
            }
            other => panic!("unexpected submission {:?}", other),
        }
    }

    #[test]
    fn test_poll_needs_two_options() {
        let values = ["Lomba 17an", "", "Panjat pinang", "2024-08-10"];
        assert!(build(&form(FormKind::CreatePoll, &values)).is_err());
    }

    #[test]
    fn test_missing_evidence_photo_is_rejected() {
        let kind = FormKind::DistributeBansos { recipient_id: 3 };
        let err = build(&form(kind.clone(), &["Beras 10kg", "/nonexistent/bukti.jpg"])).unwrap_err();
        assert!(err.starts_with("File tidak ditemukan"));

        let photo = tempfile::NamedTempFile::new().unwrap();
        let path = photo.path().display().to_string();
        match build(&form(kind, &["Beras 10kg", path.as_str()])).unwrap() {
            Submission::Mutation(Mutation::DistributeBansos {
                evidence_photo: Some(p),
                ..
            }) => assert_eq!(p, photo.path()),
            other => panic!("unexpected submission {:?}", other),
        }
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut h = Harness::signed_in(Role::AdminRt);
        h.app.model.ui.input_form = Some(form(FormKind::KasTransfer, &["1", "2", "banyak", ""]));

        h.app.submit_form();
        assert!(h.app.model.ui.input_form.is_some());
        assert!(h.app.model.ui.toast.as_ref().unwrap().is_error());
        assert!(h.drain().is_empty());
    }

    #[test]
    fn test_submitted_login_marks_signing_in() {
        let mut h = Harness::new();
        h.app.model.ui.input_form = Some(form(FormKind::Login, &["budi@example.id", "rahasia"]));

        h.app.submit_form();
        assert!(h.app.model.ui.input_form.is_none());
        assert!(h.app.model.session.signing_in);
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Login { email, .. }] if email == "budi@example.id"
        ));
    }
}
