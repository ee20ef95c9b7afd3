use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use wargatui::api::{
    Ack, Announcement, AuthSession, BansosRecipient, BoardingHouse, Comment, DepositAction,
    KasSummary, KasTransaction, KasTransferRequest, LikeOutcome, NewBansosRecipient,
    NewBoardingHouse, NewPoll, NewProduct, NewRondaSchedule, NewStore, OtpVerification, Poll,
    Product, ResetPasswordRequest, RondaOverview, Store, UserProfile, WargaClient, WargaDashboard,
};
use wargatui::error::ApiResult;
use wargatui::model::LoadTarget;

/// Priority level for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,   // User-initiated actions (login, payments, likes)
    Medium, // Loading the screen the user just opened
    Low,    // Background refresh of the visible screen
}

/// Unique identifier for deduplicating requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum RequestKey {
    Load(LoadTarget),
    Action(u64),
}

/// A change the user asked the server to make
#[derive(Debug, Clone)]
pub enum Mutation {
    PayRent {
        house_id: u64,
        tenant_id: u64,
    },
    PayDeposit {
        house_id: u64,
        tenant_id: u64,
    },
    ProcessDeposit {
        house_id: u64,
        tenant_id: u64,
        action: DepositAction,
    },
    CreateBoardingHouse(NewBoardingHouse),
    AssignRonda {
        schedule_id: u64,
        user_ids: Vec<u64>,
    },
    CreateRondaSchedule(NewRondaSchedule),
    KasTransfer(KasTransferRequest),
    Vote {
        poll_id: u64,
        option_id: u64,
    },
    CreatePoll(NewPoll),
    SaveBansos {
        editing: Option<u64>,
        recipient: NewBansosRecipient,
    },
    DeleteBansos {
        recipient_id: u64,
    },
    DistributeBansos {
        recipient_id: u64,
        notes: String,
        evidence_photo: Option<PathBuf>,
    },
    CreateStore(NewStore),
    VerifyStore {
        store_id: u64,
    },
    CreateProduct {
        product: NewProduct,
        image: Option<PathBuf>,
    },
}

impl Mutation {
    /// Toast shown when the server accepted the change without a message
    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::PayRent { .. } => "Pembayaran sewa tercatat",
            Mutation::PayDeposit { .. } => "Pembayaran deposit tercatat",
            Mutation::ProcessDeposit { .. } => "Deposit diproses",
            Mutation::CreateBoardingHouse(_) => "Kost ditambahkan",
            Mutation::AssignRonda { .. } => "Jadwal ronda diperbarui",
            Mutation::CreateRondaSchedule(_) => "Jadwal ronda dibuat",
            Mutation::KasTransfer(_) => "Transfer kas berhasil",
            Mutation::Vote { .. } => "Suara Anda tercatat",
            Mutation::CreatePoll(_) => "Voting dibuat",
            Mutation::SaveBansos { editing: None, .. } => "Penerima bansos ditambahkan",
            Mutation::SaveBansos { editing: Some(_), .. } => "Data penerima diperbarui",
            Mutation::DeleteBansos { .. } => "Penerima bansos dihapus",
            Mutation::DistributeBansos { .. } => "Bansos disalurkan",
            Mutation::CreateStore(_) => "Toko dibuat, menunggu verifikasi",
            Mutation::VerifyStore { .. } => "Toko terverifikasi",
            Mutation::CreateProduct { .. } => "Produk ditambahkan",
        }
    }

    /// Data that changed on the server and must be fetched again
    pub fn refreshes(&self) -> Vec<LoadTarget> {
        match self {
            Mutation::PayRent { house_id, .. }
            | Mutation::PayDeposit { house_id, .. }
            | Mutation::ProcessDeposit { house_id, .. } => {
                vec![LoadTarget::BoardingHouse(*house_id), LoadTarget::BoardingHouses]
            }
            Mutation::CreateBoardingHouse(_) => vec![LoadTarget::BoardingHouses],
            Mutation::AssignRonda { .. } | Mutation::CreateRondaSchedule(_) => {
                vec![LoadTarget::Ronda]
            }
            Mutation::KasTransfer(_) => vec![LoadTarget::Kas],
            Mutation::Vote { .. } | Mutation::CreatePoll(_) => vec![LoadTarget::Polls],
            Mutation::SaveBansos { .. }
            | Mutation::DeleteBansos { .. }
            | Mutation::DistributeBansos { .. } => vec![LoadTarget::Bansos],
            Mutation::CreateStore(_)
            | Mutation::VerifyStore { .. }
            | Mutation::CreateProduct { .. } => vec![LoadTarget::Market { search: None }],
        }
    }
}

/// API request types
#[derive(Debug, Clone)]
pub enum ApiRequest {
    /// Fetch data for a screen
    Load {
        target: LoadTarget,
        generation: u64,
        priority: Priority,
    },

    LoginDemo {
        role: String,
    },
    Login {
        email: String,
        password: String,
    },
    ForgotPassword {
        email: String,
    },
    VerifyOtp {
        email: String,
        otp: String,
    },
    ResetPassword(ResetPasswordRequest),
    Logout,

    /// Toggle like (already applied optimistically)
    Like {
        announcement_id: u64,
    },
    /// Post a comment (count already bumped optimistically)
    Comment {
        announcement_id: u64,
        content: String,
    },

    Mutate(Mutation),
}

impl ApiRequest {
    /// Extract priority from request
    fn priority(&self) -> Priority {
        match self {
            ApiRequest::Load { priority, .. } => *priority,
            // Everything else was triggered by a key press
            _ => Priority::High,
        }
    }
}

/// Data returned by a screen fetch
#[derive(Debug)]
pub enum LoadedData {
    Profile(UserProfile),
    Dashboard(WargaDashboard),
    Announcements(Vec<Announcement>),
    Comments(Vec<Comment>),
    BoardingHouses(Vec<BoardingHouse>),
    BoardingHouse(BoardingHouse),
    Ronda(RondaOverview),
    Kas {
        summary: KasSummary,
        transactions: Vec<KasTransaction>,
    },
    Polls(Vec<Poll>),
    Bansos(Vec<BansosRecipient>),
    Market {
        products: Vec<Product>,
        stores: Vec<Store>,
    },
}

/// API response types
#[derive(Debug)]
pub enum ApiResponse {
    Loaded {
        target: LoadTarget,
        generation: u64,
        elapsed_ms: u64,
        result: ApiResult<LoadedData>,
    },

    SignedIn(ApiResult<AuthSession>),

    ResetCodeSent {
        email: String,
        result: ApiResult<Ack>,
    },

    OtpVerified {
        email: String,
        otp: String,
        result: ApiResult<OtpVerification>,
    },

    PasswordReset(ApiResult<Ack>),

    LoggedOut(ApiResult<Ack>),

    Liked {
        announcement_id: u64,
        result: ApiResult<LikeOutcome>,
    },

    Commented {
        announcement_id: u64,
        result: ApiResult<Ack>,
    },

    Mutated {
        mutation: Mutation,
        result: ApiResult<Ack>,
    },
}

/// Internal message for tracking completed requests
pub(crate) enum InternalMessage {
    /// Carries the dispatch id handed out by `process_next`
    Completed(u64),
}

/// API service worker that processes requests in the background
struct ApiService {
    client: WargaClient,
    request_queue: VecDeque<(ApiRequest, Priority, RequestKey)>,
    /// One id per dispatched request; loads of the same target can overlap
    in_flight: HashSet<u64>,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    completion_tx: mpsc::UnboundedSender<InternalMessage>,
    max_concurrent: usize,
    next_action_id: u64,
    next_dispatch_id: u64,
}

impl ApiService {
    pub fn new(
        client: WargaClient,
        response_tx: mpsc::UnboundedSender<ApiResponse>,
        completion_tx: mpsc::UnboundedSender<InternalMessage>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            client,
            request_queue: VecDeque::new(),
            in_flight: HashSet::new(),
            response_tx,
            completion_tx,
            max_concurrent: max_concurrent.max(1),
            next_action_id: 0,
            next_dispatch_id: 0,
        }
    }

    fn key_for(&mut self, request: &ApiRequest) -> RequestKey {
        match request {
            ApiRequest::Load { target, .. } => RequestKey::Load(target.clone()),
            // Write operations don't deduplicate
            _ => {
                self.next_action_id += 1;
                RequestKey::Action(self.next_action_id)
            }
        }
    }

    /// Add a request to the queue
    ///
    /// A fetch that is already queued is replaced (keeping the newer
    /// generation) instead of being queued twice. Fetches already in flight
    /// are not deduplicated: their response may be for a stale generation.
    fn enqueue(&mut self, request: ApiRequest) {
        let priority = request.priority();
        let key = self.key_for(&request);

        if let Some(pos) = self.request_queue.iter().position(|(_, _, k)| *k == key) {
            let queued_priority = self.request_queue[pos].1;
            if queued_priority <= priority {
                // Keep the better slot, refresh the payload
                self.request_queue[pos].0 = request;
                return;
            }
            self.request_queue.remove(pos);
        }

        // Insert based on priority (high priority at front, FIFO within a priority)
        let insert_pos = self
            .request_queue
            .iter()
            .position(|(_, p, _)| *p > priority)
            .unwrap_or(self.request_queue.len());

        self.request_queue
            .insert(insert_pos, (request, priority, key));
    }

    /// Process the next request from the queue
    fn process_next(&mut self) {
        if self.in_flight.len() >= self.max_concurrent {
            return; // At capacity, wait for some to complete
        }

        let Some((request, priority, key)) = self.request_queue.pop_front() else {
            return; // Queue is empty
        };

        self.next_dispatch_id += 1;
        let dispatch_id = self.next_dispatch_id;
        self.in_flight.insert(dispatch_id);
        tracing::debug!(?key, ?priority, in_flight = self.in_flight.len(), "dispatching request");

        let client = self.client.clone();
        let response_tx = self.response_tx.clone();
        let completion_tx = self.completion_tx.clone();

        // No per-request retries; the next refresh tries again
        tokio::spawn(async move {
            let response = execute_request(&client, request).await;
            let _ = response_tx.send(response);

            // Notify service that this request is complete
            let _ = completion_tx.send(InternalMessage::Completed(dispatch_id));
        });
    }

    fn complete(&mut self, dispatch_id: u64) {
        if !self.in_flight.remove(&dispatch_id) {
            tracing::warn!(dispatch_id, "completion for unknown request");
        }
    }
}

/// Fetch everything a screen shows
async fn load(client: &WargaClient, target: &LoadTarget) -> ApiResult<LoadedData> {
    Ok(match target {
        LoadTarget::Profile => LoadedData::Profile(client.me().await?),
        LoadTarget::Dashboard => LoadedData::Dashboard(client.dashboard().await?),
        LoadTarget::Announcements => LoadedData::Announcements(client.announcements().await?),
        LoadTarget::Comments(id) => LoadedData::Comments(client.comments(*id).await?),
        LoadTarget::BoardingHouses => LoadedData::BoardingHouses(client.boarding_houses().await?),
        LoadTarget::BoardingHouse(id) => LoadedData::BoardingHouse(client.boarding_house(*id).await?),
        LoadTarget::Ronda => LoadedData::Ronda(client.ronda_overview().await?),
        LoadTarget::Kas => {
            let (summary, transactions) =
                tokio::try_join!(client.kas_summary(), client.kas_transactions(None))?;
            LoadedData::Kas {
                summary,
                transactions,
            }
        }
        LoadTarget::Polls => LoadedData::Polls(client.polls().await?),
        LoadTarget::Bansos => LoadedData::Bansos(client.bansos_recipients().await?),
        LoadTarget::Market { search } => {
            let (products, stores) =
                tokio::try_join!(client.products(search.as_deref()), client.stores())?;
            LoadedData::Market { products, stores }
        }
    })
}

async fn mutate(client: &WargaClient, mutation: &Mutation) -> ApiResult<Ack> {
    match mutation {
        Mutation::PayRent {
            house_id,
            tenant_id,
        } => client.pay_rent(*house_id, *tenant_id).await,
        Mutation::PayDeposit {
            house_id,
            tenant_id,
        } => client.pay_deposit(*house_id, *tenant_id).await,
        Mutation::ProcessDeposit {
            house_id,
            tenant_id,
            action,
        } => client.process_deposit(*house_id, *tenant_id, *action).await,
        Mutation::CreateBoardingHouse(house) => {
            let created = client.create_boarding_house(house).await?;
            Ok(Ack {
                message: Some(format!("Kost {} ditambahkan", created.name)),
            })
        }
        Mutation::AssignRonda {
            schedule_id,
            user_ids,
        } => client.assign_ronda(*schedule_id, user_ids).await,
        Mutation::CreateRondaSchedule(schedule) => client.create_ronda_schedule(schedule).await,
        Mutation::KasTransfer(transfer) => client.kas_transfer(transfer).await,
        Mutation::Vote { poll_id, option_id } => client.vote(*poll_id, *option_id).await,
        Mutation::CreatePoll(poll) => client.create_poll(poll).await,
        Mutation::SaveBansos {
            editing: Some(id),
            recipient,
        } => client.update_bansos_recipient(*id, recipient).await,
        Mutation::SaveBansos {
            editing: None,
            recipient,
        } => client.create_bansos_recipient(recipient).await,
        Mutation::DeleteBansos { recipient_id } => {
            client.delete_bansos_recipient(*recipient_id).await
        }
        Mutation::DistributeBansos {
            recipient_id,
            notes,
            evidence_photo,
        } => {
            client
                .distribute_bansos(*recipient_id, Some(notes), evidence_photo.as_deref())
                .await
        }
        Mutation::CreateStore(store) => client.create_store(store).await,
        Mutation::VerifyStore { store_id } => client.verify_store(*store_id).await,
        Mutation::CreateProduct { product, image } => {
            client.create_product(product, image.as_deref()).await
        }
    }
}

/// Execute an API request and return the response
async fn execute_request(client: &WargaClient, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Load {
            target, generation, ..
        } => {
            let started = Instant::now();
            let result = load(client, &target).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            if let Err(e) = &result {
                tracing::debug!(load = target.label(), error = %e, "load failed");
            }

            ApiResponse::Loaded {
                target,
                generation,
                elapsed_ms,
                result,
            }
        }

        ApiRequest::LoginDemo { role } => ApiResponse::SignedIn(client.login_demo(&role).await),

        ApiRequest::Login { email, password } => {
            ApiResponse::SignedIn(client.login(&email, &password).await)
        }

        ApiRequest::ForgotPassword { email } => {
            let result = client.forgot_password(&email).await;
            ApiResponse::ResetCodeSent { email, result }
        }

        ApiRequest::VerifyOtp { email, otp } => {
            let result = client.verify_otp(&email, &otp).await;
            ApiResponse::OtpVerified { email, otp, result }
        }

        ApiRequest::ResetPassword(reset) => {
            ApiResponse::PasswordReset(client.reset_password(&reset).await)
        }

        ApiRequest::Logout => ApiResponse::LoggedOut(client.logout().await),

        ApiRequest::Like { announcement_id } => ApiResponse::Liked {
            announcement_id,
            result: client.like_announcement(announcement_id).await,
        },

        ApiRequest::Comment {
            announcement_id,
            content,
        } => ApiResponse::Commented {
            announcement_id,
            result: client.add_comment(announcement_id, &content).await,
        },

        ApiRequest::Mutate(mutation) => {
            let result = mutate(client, &mutation).await;
            if let Err(e) = &result {
                tracing::warn!(?mutation, error = %e, "mutation failed");
            }
            ApiResponse::Mutated { mutation, result }
        }
    }
}

/// Spawn the API service worker
pub fn spawn_api_service(
    client: WargaClient,
    max_concurrent: usize,
) -> (
    mpsc::UnboundedSender<ApiRequest>,
    mpsc::UnboundedReceiver<ApiResponse>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<InternalMessage>();

    tokio::spawn(async move {
        let mut service = ApiService::new(client, response_tx, completion_tx, max_concurrent);

        // Ticker for processing queue
        let mut tick = interval(Duration::from_millis(10));

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    match request {
                        Some(request) => service.enqueue(request),
                        // App dropped its sender: shut down
                        None => break,
                    }
                }

                Some(InternalMessage::Completed(dispatch_id)) = completion_rx.recv() => {
                    service.complete(dispatch_id);
                }

                _ = tick.tick() => {
                    while !service.request_queue.is_empty()
                        && service.in_flight.len() < service.max_concurrent
                    {
                        service.process_next();
                    }
                }
            }
        }
    });

    (request_tx, response_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(max_concurrent: usize) -> ApiService {
        let (response_tx, _response_rx) = mpsc::unbounded_channel();
        let (completion_tx, _completion_rx) = mpsc::unbounded_channel();
        ApiService::new(
            WargaClient::new("http://localhost:1".to_string()),
            response_tx,
            completion_tx,
            max_concurrent,
        )
    }

    fn load_request(target: LoadTarget, generation: u64, priority: Priority) -> ApiRequest {
        ApiRequest::Load {
            target,
            generation,
            priority,
        }
    }

    fn queued_targets(service: &ApiService) -> Vec<String> {
        service
            .request_queue
            .iter()
            .map(|(request, _, _)| match request {
                ApiRequest::Load { target, .. } => target.label().to_string(),
                ApiRequest::Logout => "logout".to_string(),
                other => format!("{:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_queue_orders_by_priority_then_fifo() {
        let mut service = service(6);
        service.enqueue(load_request(LoadTarget::Kas, 1, Priority::Low));
        service.enqueue(load_request(LoadTarget::Polls, 1, Priority::Medium));
        service.enqueue(ApiRequest::Logout);
        service.enqueue(load_request(LoadTarget::Bansos, 1, Priority::Medium));

        assert_eq!(
            queued_targets(&service),
            vec!["logout", "voting", "penerima bansos", "kas RT"]
        );
    }

    #[test]
    fn test_queued_load_is_replaced_with_newer_generation() {
        let mut service = service(6);
        service.enqueue(load_request(LoadTarget::Kas, 1, Priority::Medium));
        service.enqueue(load_request(LoadTarget::Kas, 2, Priority::Low));

        assert_eq!(service.request_queue.len(), 1);
        match &service.request_queue[0].0 {
            ApiRequest::Load { generation, .. } => assert_eq!(*generation, 2),
            other => panic!("unexpected request {:?}", other),
        }
        assert_eq!(service.request_queue[0].1, Priority::Medium);
    }

    #[test]
    fn test_higher_priority_duplicate_moves_forward() {
        let mut service = service(6);
        service.enqueue(load_request(LoadTarget::Polls, 1, Priority::Medium));
        service.enqueue(load_request(LoadTarget::Kas, 1, Priority::Low));
        service.enqueue(load_request(LoadTarget::Kas, 2, Priority::High));

        assert_eq!(queued_targets(&service), vec!["kas RT", "voting"]);
    }

    #[test]
    fn test_actions_are_never_deduplicated() {
        let mut service = service(6);
        let vote = ApiRequest::Mutate(Mutation::Vote {
            poll_id: 1,
            option_id: 2,
        });
        service.enqueue(vote.clone());
        service.enqueue(vote);
        assert_eq!(service.request_queue.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrency_cap() {
        let mut service = service(2);
        service.enqueue(load_request(LoadTarget::Kas, 1, Priority::Medium));
        service.enqueue(load_request(LoadTarget::Polls, 1, Priority::Medium));
        service.enqueue(load_request(LoadTarget::Bansos, 1, Priority::Medium));

        service.process_next();
        service.process_next();
        service.process_next();

        assert_eq!(service.in_flight.len(), 2);
        assert_eq!(service.request_queue.len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_loads_of_one_target_count_separately() {
        let mut service = service(2);

        // Second Kas load is issued while the first is still running
        service.enqueue(load_request(LoadTarget::Kas, 1, Priority::Medium));
        service.process_next();
        service.enqueue(load_request(LoadTarget::Kas, 2, Priority::Medium));
        service.process_next();
        assert_eq!(service.in_flight.len(), 2);

        service.enqueue(load_request(LoadTarget::Polls, 2, Priority::Medium));
        service.process_next();
        assert_eq!(service.in_flight.len(), 2);
        assert_eq!(queued_targets(&service), vec!["voting"]);

        // Finishing the first Kas load frees exactly one slot
        let first = *service.in_flight.iter().min().unwrap();
        service.complete(first);
        assert_eq!(service.in_flight.len(), 1);

        service.process_next();
        assert_eq!(service.in_flight.len(), 2);
        assert!(service.request_queue.is_empty());
    }

    #[test]
    fn test_payment_refreshes_house_detail() {
        let refreshes = Mutation::PayRent {
            house_id: 5,
            tenant_id: 9,
        }
        .refreshes();
        assert!(refreshes.contains(&LoadTarget::BoardingHouse(5)));
        assert!(refreshes.contains(&LoadTarget::BoardingHouses));
    }
}
