//! User actions: optimistic reactions, confirmations and mutations

use crate::api::DepositAction;
use crate::logic::optimistic::Reaction;
use crate::model::{
    ConfirmAction, FormKind, InputForm, OptionPicker, PickerOption, PickerPurpose,
};
use crate::services::{ApiRequest, Mutation};
use crate::App;

impl App {
    /// Send a change to the server; the response refreshes what it touched
    pub(crate) fn mutate(&mut self, mutation: Mutation) {
        tracing::debug!(?mutation, "submitting mutation");
        self.model.performance.pending_mutations += 1;
        self.send(ApiRequest::Mutate(mutation));
    }

    /// Show a toast and return false unless the user administers the RT/RW
    fn require_admin(&mut self) -> bool {
        if self.model.session.is_admin() {
            return true;
        }
        self.model
            .ui
            .show_error("Hanya pengurus RT/RW yang dapat melakukan ini");
        false
    }

    pub(crate) fn open_form(&mut self, form: InputForm) {
        self.model.ui.close_all_modals();
        self.model.ui.input_form = Some(form);
    }

    // ============================================
    // ANNOUNCEMENTS
    // ============================================

    /// Like or unlike the selected announcement right away, then tell the server
    pub(crate) fn toggle_like(&mut self) {
        let Some(id) = self.model.selected_announcement().map(|a| a.id) else {
            return;
        };
        // The server toggles, so a second press before the answer would race it
        if self.model.performance.has_pending_like(id) {
            return;
        }
        if self.model.apply_optimistic(id, Reaction::ToggleLike) {
            self.send(ApiRequest::Like {
                announcement_id: id,
            });
        }
    }

    pub(crate) fn begin_comment(&mut self) {
        if let Some(id) = self.model.selected_announcement().map(|a| a.id) {
            self.open_form(InputForm::new(FormKind::Comment {
                announcement_id: id,
            }));
        }
    }

    /// Post a comment, counting it before the server confirms
    pub(crate) fn post_comment(&mut self, announcement_id: u64, content: String) {
        if self
            .model
            .apply_optimistic(announcement_id, Reaction::AddComment)
        {
            self.send(ApiRequest::Comment {
                announcement_id,
                content,
            });
        }
    }

    // ============================================
    // KOST
    // ============================================

    /// Tenant in the room under the grid cursor, with the open house id
    fn selected_tenant(&mut self) -> Option<(u64, u64, String)> {
        let house_id = self.model.navigation.open_house?;
        let tenant = self
            .model
            .selected_room()
            .and_then(|room| room.tenant.as_ref())
            .map(|t| (t.id, t.name.clone()));
        match tenant {
            Some((tenant_id, name)) => Some((house_id, tenant_id, name)),
            None => {
                self.model.ui.show_error("Kamar ini kosong");
                None
            }
        }
    }

    fn require_kost_manager(&mut self) -> bool {
        if self.model.session.role().manages_kost() {
            return true;
        }
        self.model
            .ui
            .show_error("Hanya pemilik kost yang dapat mencatat pembayaran");
        false
    }

    pub(crate) fn begin_pay_rent(&mut self) {
        if !self.require_kost_manager() {
            return;
        }
        if let Some((house_id, tenant_id, tenant_name)) = self.selected_tenant() {
            self.model.ui.confirm_action = Some(ConfirmAction::PayRent {
                house_id,
                tenant_id,
                tenant_name,
            });
        }
    }

    pub(crate) fn begin_pay_deposit(&mut self) {
        if !self.require_kost_manager() {
            return;
        }
        if let Some((house_id, tenant_id, tenant_name)) = self.selected_tenant() {
            self.model.ui.confirm_action = Some(ConfirmAction::PayDeposit {
                house_id,
                tenant_id,
                tenant_name,
            });
        }
    }

    pub(crate) fn begin_process_deposit(&mut self) {
        if !self.require_kost_manager() {
            return;
        }
        let Some((house_id, tenant_id, tenant_name)) = self.selected_tenant() else {
            return;
        };
        let options = [DepositAction::Refund, DepositAction::Forfeit]
            .iter()
            .enumerate()
            .map(|(idx, action)| PickerOption {
                id: idx as u64,
                key: format!("{:?}", action).to_lowercase(),
                label: action.label().to_string(),
            })
            .collect();
        self.model.ui.option_picker = Some(OptionPicker::new(
            format!("Deposit {}", tenant_name),
            PickerPurpose::DepositAction {
                house_id,
                tenant_id,
                tenant_name,
            },
            options,
        ));
    }

    pub(crate) fn begin_create_house(&mut self) {
        if self.require_kost_manager() {
            self.open_form(InputForm::new(FormKind::CreateBoardingHouse));
        }
    }

    // ============================================
    // RONDA
    // ============================================

    /// Sign the current user up for the selected patrol
    pub(crate) fn begin_assign_ronda(&mut self) {
        let Some(user_id) = self.model.session.user_id() else {
            return;
        };
        let Some(schedule) = self.model.selected_ronda_schedule() else {
            return;
        };
        if schedule.members.iter().any(|m| m.id == user_id) {
            self.model.ui.show_toast("Anda sudah terdaftar di jadwal ini");
            return;
        }

        let schedule_id = schedule.id;
        let mut user_ids: Vec<u64> = schedule.members.iter().map(|m| m.id).collect();
        user_ids.push(user_id);
        let schedule_label = format!(
            "{} {}",
            crate::logic::formatting::format_optional_date(schedule.date.as_deref()),
            schedule.shift.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        self.model.ui.confirm_action = Some(ConfirmAction::AssignRonda {
            schedule_id,
            user_ids,
            schedule_label,
        });
    }

    pub(crate) fn begin_create_ronda(&mut self) {
        if self.require_admin() {
            self.open_form(InputForm::new(FormKind::CreateRondaSchedule));
        }
    }

    // ============================================
    // KAS, VOTING
    // ============================================

    pub(crate) fn begin_kas_transfer(&mut self) {
        if self.require_admin() {
            self.open_form(InputForm::new(FormKind::KasTransfer));
        }
    }

    pub(crate) fn begin_vote(&mut self) {
        let Some(poll) = self.model.selected_poll() else {
            return;
        };
        if poll.has_voted || poll.user_vote_option_id.is_some() {
            self.model.ui.show_toast("Anda sudah memberikan suara");
            return;
        }
        let options = poll
            .options
            .iter()
            .map(|option| PickerOption {
                id: option.id,
                key: option.id.to_string(),
                label: option.label.clone(),
            })
            .collect();
        let picker = OptionPicker::new(
            poll.title.clone(),
            PickerPurpose::PollOption { poll_id: poll.id },
            options,
        );
        self.model.ui.option_picker = Some(picker);
    }

    pub(crate) fn begin_create_poll(&mut self) {
        if self.require_admin() {
            self.open_form(InputForm::new(FormKind::CreatePoll));
        }
    }

    // ============================================
    // BANSOS
    // ============================================

    pub(crate) fn begin_add_bansos(&mut self) {
        if self.require_admin() {
            self.open_form(InputForm::new(FormKind::BansosRecipient { editing: None }));
        }
    }

    pub(crate) fn begin_edit_bansos(&mut self) {
        if !self.require_admin() {
            return;
        }
        let Some(recipient) = self.model.selected_bansos() else {
            return;
        };
        let form = InputForm::new(FormKind::BansosRecipient {
            editing: Some(recipient.id),
        })
        .with_values([
            recipient.name.clone(),
            recipient.nik.clone().unwrap_or_default(),
            recipient.program.clone().unwrap_or_default(),
            recipient.address.clone().unwrap_or_default(),
        ]);
        self.open_form(form);
    }

    pub(crate) fn begin_delete_bansos(&mut self) {
        if !self.require_admin() {
            return;
        }
        if let Some(recipient) = self.model.selected_bansos() {
            self.model.ui.confirm_action = Some(ConfirmAction::DeleteBansos {
                recipient_id: recipient.id,
                name: recipient.name.clone(),
            });
        }
    }

    pub(crate) fn begin_distribute_bansos(&mut self) {
        if !self.require_admin() {
            return;
        }
        let Some(recipient) = self.model.selected_bansos() else {
            return;
        };
        if recipient.is_distributed() {
            self.model.ui.show_toast("Bansos sudah disalurkan");
            return;
        }
        let recipient_id = recipient.id;
        self.open_form(InputForm::new(FormKind::DistributeBansos { recipient_id }));
    }

    // ============================================
    // PASAR
    // ============================================

    pub(crate) fn begin_verify_store(&mut self) {
        if !self.require_admin() {
            return;
        }
        let Some(store) = self.model.selected_store() else {
            return;
        };
        if store.is_verified {
            self.model.ui.show_toast("Toko sudah terverifikasi");
            return;
        }
        self.model.ui.confirm_action = Some(ConfirmAction::VerifyStore {
            store_id: store.id,
            name: store.name.clone(),
        });
    }

    pub(crate) fn begin_product_search(&mut self) {
        let current = self.model.screens.product_search.clone().unwrap_or_default();
        self.open_form(InputForm::new(FormKind::ProductSearch).with_values([current]));
    }

    // ============================================
    // MODAL ANSWERS
    // ============================================

    /// The user answered 'y' to the pending confirmation
    pub(crate) fn confirm_pending(&mut self) {
        let Some(action) = self.model.ui.confirm_action.take() else {
            return;
        };
        let mutation = match action {
            ConfirmAction::PayRent {
                house_id,
                tenant_id,
                ..
            } => Mutation::PayRent {
                house_id,
                tenant_id,
            },
            ConfirmAction::PayDeposit {
                house_id,
                tenant_id,
                ..
            } => Mutation::PayDeposit {
                house_id,
                tenant_id,
            },
            ConfirmAction::ProcessDeposit {
                house_id,
                tenant_id,
                action,
                ..
            } => Mutation::ProcessDeposit {
                house_id,
                tenant_id,
                action,
            },
            ConfirmAction::AssignRonda {
                schedule_id,
                user_ids,
                ..
            } => Mutation::AssignRonda {
                schedule_id,
                user_ids,
            },
            ConfirmAction::Vote {
                poll_id, option_id, ..
            } => Mutation::Vote { poll_id, option_id },
            ConfirmAction::DeleteBansos { recipient_id, .. } => {
                Mutation::DeleteBansos { recipient_id }
            }
            ConfirmAction::VerifyStore { store_id, .. } => Mutation::VerifyStore { store_id },
            ConfirmAction::Logout => {
                self.send(ApiRequest::Logout);
                return;
            }
        };
        self.mutate(mutation);
    }

    /// The user picked the highlighted option of the open picker
    pub(crate) fn choose_option(&mut self) {
        let Some(picker) = self.model.ui.option_picker.take() else {
            return;
        };
        let Some(option) = picker.selected_option().cloned() else {
            return;
        };

        match picker.purpose {
            PickerPurpose::DemoRole => self.login_demo(option.key),
            PickerPurpose::DepositAction {
                house_id,
                tenant_id,
                tenant_name,
            } => {
                let action = if option.key == "forfeit" {
                    DepositAction::Forfeit
                } else {
                    DepositAction::Refund
                };
                self.model.ui.confirm_action = Some(ConfirmAction::ProcessDeposit {
                    house_id,
                    tenant_id,
                    tenant_name,
                    action,
                });
            }
            PickerPurpose::PollOption { poll_id } => {
                self.model.ui.confirm_action = Some(ConfirmAction::Vote {
                    poll_id,
                    option_id: option.id,
                    option_label: option.label,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Announcement, BoardingHouse, Role};
    use crate::app::testing::Harness;
    use crate::Screen;

    fn announcement(id: u64, liked: bool, likes: u32) -> Announcement {
        Announcement {
            id,
            title: "Posyandu".into(),
            content: String::new(),
            author: None,
            created_at: None,
            likes_count: likes,
            comments_count: 1,
            is_liked: liked,
        }
    }

    fn open_house_with_tenant(h: &mut Harness) {
        let house: BoardingHouse = serde_json::from_value(serde_json::json!({
            "id": 4,
            "name": "Kost Mawar",
            "total_rooms": 2,
            "tenants": [{ "id": 31, "name": "Dewi", "room_number": "1" }]
        }))
        .unwrap();
        h.app.model.navigation.switch_to(Screen::Kost);
        h.app.model.navigation.open_house(4);
        h.app.model.screens.set_house_detail(house);
    }

    #[test]
    fn test_like_is_applied_before_the_server_answers() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.screens.announcements = vec![announcement(1, false, 4)];
        h.app.model.navigation.set_selection(Screen::Pengumuman, Some(0));

        h.app.toggle_like();
        assert!(h.app.model.screens.announcements[0].is_liked);
        assert_eq!(h.app.model.screens.announcements[0].likes_count, 5);
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Like { announcement_id: 1 }]
        ));

        // Second press while the first is pending is ignored
        h.app.toggle_like();
        assert!(h.drain().is_empty());
        assert_eq!(h.app.model.screens.announcements[0].likes_count, 5);
    }

    #[test]
    fn test_comment_count_is_bumped_optimistically() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.screens.announcements = vec![announcement(1, false, 0)];

        h.app.post_comment(1, "Siap hadir".into());
        assert_eq!(h.app.model.screens.announcements[0].comments_count, 2);
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Comment { announcement_id: 1, content }] if content == "Siap hadir"
        ));

        // Unknown announcement: nothing is sent
        h.app.post_comment(9, "?".into());
        assert!(h.drain().is_empty());
    }

    #[test]
    fn test_pay_rent_needs_confirmation() {
        let mut h = Harness::signed_in(Role::PemilikKost);
        open_house_with_tenant(&mut h);

        h.app.begin_pay_rent();
        assert!(matches!(
            h.app.model.ui.confirm_action,
            Some(ConfirmAction::PayRent { tenant_id: 31, .. })
        ));
        assert!(h.drain().is_empty());

        h.app.confirm_pending();
        assert_eq!(h.app.model.performance.pending_mutations, 1);
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Mutate(Mutation::PayRent {
                house_id: 4,
                tenant_id: 31
            })]
        ));
    }

    #[test]
    fn test_empty_room_cannot_be_paid() {
        let mut h = Harness::signed_in(Role::PemilikKost);
        open_house_with_tenant(&mut h);
        h.app.model.navigation.grid_cursor.room = 1;

        h.app.begin_pay_rent();
        assert!(h.app.model.ui.confirm_action.is_none());
        assert!(h.app.model.ui.toast.as_ref().unwrap().is_error());
    }

    #[test]
    fn test_resident_cannot_record_payments() {
        let mut h = Harness::signed_in(Role::Warga);
        open_house_with_tenant(&mut h);
        h.app.begin_pay_deposit();
        assert!(h.app.model.ui.confirm_action.is_none());
    }

    #[test]
    fn test_process_deposit_goes_through_picker_then_confirm() {
        let mut h = Harness::signed_in(Role::PemilikKost);
        open_house_with_tenant(&mut h);

        h.app.begin_process_deposit();
        let picker = h.app.model.ui.option_picker.as_mut().unwrap();
        picker.selected = Some(1);
        h.app.choose_option();

        assert!(matches!(
            h.app.model.ui.confirm_action,
            Some(ConfirmAction::ProcessDeposit {
                action: DepositAction::Forfeit,
                ..
            })
        ));
        h.app.confirm_pending();
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Mutate(Mutation::ProcessDeposit {
                action: DepositAction::Forfeit,
                ..
            })]
        ));
    }

    #[test]
    fn test_vote_flow_and_already_voted() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.screens.polls = serde_json::from_value(serde_json::json!([
            { "id": 2, "title": "Lokasi pos ronda", "options": [
                { "id": 20, "label": "Depan masjid" },
                { "id": 21, "label": "Ujung gang" }
            ]},
            { "id": 3, "title": "Iuran", "has_voted": true, "options": [] }
        ]))
        .unwrap();
        h.app.model.navigation.set_selection(Screen::Voting, Some(0));

        h.app.begin_vote();
        h.app.model.ui.option_picker.as_mut().unwrap().selected = Some(1);
        h.app.choose_option();
        h.app.confirm_pending();
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Mutate(Mutation::Vote {
                poll_id: 2,
                option_id: 21
            })]
        ));

        h.app.model.navigation.set_selection(Screen::Voting, Some(1));
        h.app.begin_vote();
        assert!(h.app.model.ui.option_picker.is_none());
    }

    #[test]
    fn test_assign_ronda_adds_current_user_to_members() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.screens.ronda.today = serde_json::from_value(serde_json::json!([
            { "id": 7, "date": "2024-08-17", "shift": "malam",
              "members": [{ "id": 3, "name": "Pak Eko" }] }
        ]))
        .unwrap();
        h.app.model.navigation.set_selection(Screen::Ronda, Some(0));

        h.app.begin_assign_ronda();
        match &h.app.model.ui.confirm_action {
            Some(ConfirmAction::AssignRonda {
                schedule_id,
                user_ids,
                schedule_label,
            }) => {
                assert_eq!(*schedule_id, 7);
                assert_eq!(user_ids, &vec![3, 42]);
                assert_eq!(schedule_label, "17 Agu 2024 malam");
            }
            other => panic!("unexpected confirmation {:?}", other),
        }
    }

    #[test]
    fn test_admin_only_actions() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.begin_kas_transfer();
        assert!(h.app.model.ui.input_form.is_none());
        assert!(h.app.model.ui.toast.as_ref().unwrap().is_error());

        let mut admin = Harness::signed_in(Role::AdminRw);
        admin.app.begin_kas_transfer();
        assert_eq!(
            admin.app.model.ui.input_form.as_ref().map(|f| &f.kind),
            Some(&FormKind::KasTransfer)
        );
    }

    #[test]
    fn test_logout_confirmation_sends_logout() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.ui.confirm_action = Some(ConfirmAction::Logout);
        h.app.confirm_pending();
        assert!(matches!(h.drain().as_slice(), [ApiRequest::Logout]));
        assert_eq!(h.app.model.performance.pending_mutations, 0);
    }
}
