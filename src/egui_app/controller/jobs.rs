use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};

use crate::api::auth::LoginRequest;
use crate::api::models::{ActiveModelInfo, ModelRecord, ModelUpdate, PredictRequest};
use crate::api::predictions::{DailyCount, PredictionPage, PredictionQuery};
use crate::api::uploads::UploadTicketRequest;
use crate::api::users::{UserPage, UserQuery, UserRecord, UserUpdate};
use crate::api::{ApiClient, ApiError};
use crate::dataset::ClassDistribution;
use crate::egui_app::state::{ProgressTaskKind, RecordFilterOptions};
use crate::session::Session;

use super::dataset_export::DatasetExportError;

type TryRecvError = std::sync::mpsc::TryRecvError;

pub(crate) enum JobMessage {
    SignedIn(SignInResult),
    ModelBannerLoaded(ModelBannerResult),
    UploadProgress(UploadProgressUpdate),
    Predicted(PredictResult),
    HistoryLoaded(HistoryResult),
    RecordsLoaded(RecordsResult),
    RecordFiltersLoaded(RecordFiltersResult),
    PredictionDeleted(PredictionDeleteResult),
    ModelsLoaded(ModelsResult),
    ModelSaved(ModelSaveResult),
    ModelDeleted(ModelDeleteResult),
    ModelActivated(ModelActivateResult),
    StatsLoaded(StatsResult),
    UsersLoaded(UsersResult),
    UserDetailLoaded(UserDetailResult),
    UserSaved(UserSaveResult),
    UserDeleted(UserDeleteResult),
    DatasetStatsLoaded(DatasetStatsResult),
    DatasetExported(DatasetExportResult),
}

pub(crate) struct SignInResult {
    pub(crate) result: Result<Session, ApiError>,
}

/// Outcome of the two banner calls; each half degrades independently.
pub(crate) struct ModelBannerResult {
    pub(crate) info: Result<ActiveModelInfo, ApiError>,
    pub(crate) available: Result<bool, ApiError>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct UploadProgressUpdate {
    pub(crate) task: ProgressTaskKind,
    pub(crate) sent: u64,
    pub(crate) total: u64,
}

pub(crate) struct PredictJob {
    pub(crate) client: ApiClient,
    pub(crate) request: PredictRequest,
    pub(crate) image_path: PathBuf,
    pub(crate) ticket_request: UploadTicketRequest,
}

pub(crate) struct PredictResult {
    pub(crate) result: Result<Vec<f64>, ApiError>,
}

pub(crate) struct HistoryResult {
    pub(crate) page: u32,
    pub(crate) result: Result<PredictionPage, ApiError>,
}

pub(crate) struct RecordsResult {
    pub(crate) query: PredictionQuery,
    pub(crate) result: Result<PredictionPage, ApiError>,
}

pub(crate) struct RecordFiltersResult {
    pub(crate) result: Result<RecordFilterOptions, ApiError>,
}

pub(crate) struct PredictionDeleteResult {
    pub(crate) result: Result<(), ApiError>,
}

pub(crate) struct ModelsResult {
    pub(crate) result: Result<Vec<ModelRecord>, ApiError>,
}

pub(crate) struct ModelCreateJob {
    pub(crate) client: ApiClient,
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) accuracy: Option<f64>,
    pub(crate) artifact_path: PathBuf,
    pub(crate) artifact_ticket: UploadTicketRequest,
    pub(crate) labels: Option<(PathBuf, UploadTicketRequest)>,
    pub(crate) activate: bool,
}

pub(crate) struct ModelSaveResult {
    pub(crate) created: bool,
    pub(crate) result: Result<(), ApiError>,
}

pub(crate) struct ModelDeleteResult {
    pub(crate) result: Result<(), ApiError>,
}

pub(crate) struct ModelActivateResult {
    pub(crate) result: Result<(), ApiError>,
}

/// Everything the dashboard cards need, fetched in one pass.
pub(crate) struct StatsOutcome {
    pub(crate) total_predictions: u64,
    pub(crate) series: Vec<DailyCount>,
    pub(crate) average_confidence: f64,
    pub(crate) distribution: ClassDistribution,
}

pub(crate) struct StatsResult {
    pub(crate) result: Result<StatsOutcome, ApiError>,
}

pub(crate) struct UsersResult {
    pub(crate) query: UserQuery,
    pub(crate) result: Result<UserPage, ApiError>,
}

pub(crate) struct UserDetailResult {
    pub(crate) user_id: String,
    pub(crate) result: Result<UserRecord, ApiError>,
}

pub(crate) struct UserSaveResult {
    pub(crate) result: Result<(), ApiError>,
}

pub(crate) struct UserDeleteResult {
    pub(crate) result: Result<(), ApiError>,
}

pub(crate) struct DatasetStatsResult {
    pub(crate) result: Result<ClassDistribution, ApiError>,
}

pub(crate) struct DatasetExportResult {
    pub(crate) result: Result<PathBuf, DatasetExportError>,
}

/// Background workers owned by the controller. Every network call runs on a
/// spawned thread and reports back over `message_rx`, drained once per frame.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    pub(super) sign_in_in_progress: bool,
    pub(super) model_banner_in_progress: bool,
    pub(super) predict_in_progress: bool,
    pub(super) history_in_progress: bool,
    pub(super) records_in_progress: bool,
    pub(super) record_filters_in_progress: bool,
    pub(super) prediction_delete_in_progress: bool,
    pub(super) models_in_progress: bool,
    pub(super) model_save_in_progress: bool,
    pub(super) model_delete_in_progress: bool,
    pub(super) model_activate_in_progress: bool,
    pub(super) stats_in_progress: bool,
    pub(super) users_in_progress: bool,
    pub(super) user_detail_in_progress: bool,
    pub(super) user_save_in_progress: bool,
    pub(super) user_delete_in_progress: bool,
    pub(super) dataset_stats_in_progress: bool,
    pub(super) dataset_export_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            sign_in_in_progress: false,
            model_banner_in_progress: false,
            predict_in_progress: false,
            history_in_progress: false,
            records_in_progress: false,
            record_filters_in_progress: false,
            prediction_delete_in_progress: false,
            models_in_progress: false,
            model_save_in_progress: false,
            model_delete_in_progress: false,
            model_activate_in_progress: false,
            stats_in_progress: false,
            users_in_progress: false,
            user_detail_in_progress: false,
            user_save_in_progress: false,
            user_delete_in_progress: false,
            dataset_stats_in_progress: false,
            dataset_export_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    /// True while any worker is running; drives frame scheduling.
    pub(super) fn any_in_progress(&self) -> bool {
        self.sign_in_in_progress
            || self.model_banner_in_progress
            || self.predict_in_progress
            || self.history_in_progress
            || self.records_in_progress
            || self.record_filters_in_progress
            || self.prediction_delete_in_progress
            || self.models_in_progress
            || self.model_save_in_progress
            || self.model_delete_in_progress
            || self.model_activate_in_progress
            || self.stats_in_progress
            || self.users_in_progress
            || self.user_detail_in_progress
            || self.user_save_in_progress
            || self.user_delete_in_progress
            || self.dataset_stats_in_progress
            || self.dataset_export_in_progress
    }

    pub(super) fn begin_sign_in(&mut self, client: ApiClient, request: LoginRequest) {
        if self.sign_in_in_progress {
            return;
        }
        self.sign_in_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::auth::login(&client, &request);
            let _ = tx.send(JobMessage::SignedIn(SignInResult { result }));
        });
    }

    pub(super) fn clear_sign_in(&mut self) {
        self.sign_in_in_progress = false;
    }

    pub(super) fn begin_model_banner(&mut self, client: ApiClient) {
        if self.model_banner_in_progress {
            return;
        }
        self.model_banner_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let info = crate::api::models::fetch_active_model_info(&client);
            let available = crate::api::models::fetch_model_availability(&client);
            let _ = tx.send(JobMessage::ModelBannerLoaded(ModelBannerResult {
                info,
                available,
            }));
        });
    }

    pub(super) fn clear_model_banner(&mut self) {
        self.model_banner_in_progress = false;
    }

    pub(super) fn predict_in_progress(&self) -> bool {
        self.predict_in_progress
    }

    pub(super) fn begin_predict(&mut self, job: PredictJob) {
        if self.predict_in_progress {
            return;
        }
        self.predict_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = super::predict::run_predict_job(&job, move |sent, total| {
                let _ = progress_tx.send(JobMessage::UploadProgress(UploadProgressUpdate {
                    task: ProgressTaskKind::Predict,
                    sent,
                    total,
                }));
            });
            let _ = tx.send(JobMessage::Predicted(PredictResult { result }));
        });
    }

    pub(super) fn clear_predict(&mut self) {
        self.predict_in_progress = false;
    }

    pub(super) fn begin_history(&mut self, client: ApiClient, doctor_id: String, page: u32) {
        if self.history_in_progress {
            return;
        }
        self.history_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::predictions::fetch_doctor_predictions(
                &client,
                &doctor_id,
                page,
                super::PAGE_SIZE,
            );
            let _ = tx.send(JobMessage::HistoryLoaded(HistoryResult { page, result }));
        });
    }

    pub(super) fn clear_history(&mut self) {
        self.history_in_progress = false;
    }

    pub(super) fn begin_records(&mut self, client: ApiClient, query: PredictionQuery) {
        if self.records_in_progress {
            return;
        }
        self.records_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::predictions::fetch_predictions(&client, &query);
            let _ = tx.send(JobMessage::RecordsLoaded(RecordsResult { query, result }));
        });
    }

    pub(super) fn clear_records(&mut self) {
        self.records_in_progress = false;
    }

    pub(super) fn begin_record_filters(&mut self, client: ApiClient) {
        if self.record_filters_in_progress {
            return;
        }
        self.record_filters_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = super::records::run_record_filters_job(&client);
            let _ = tx.send(JobMessage::RecordFiltersLoaded(RecordFiltersResult {
                result,
            }));
        });
    }

    pub(super) fn clear_record_filters(&mut self) {
        self.record_filters_in_progress = false;
    }

    pub(super) fn begin_prediction_delete(
        &mut self,
        client: ApiClient,
        id: String,
        image_key: String,
    ) {
        if self.prediction_delete_in_progress {
            return;
        }
        self.prediction_delete_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::predictions::delete_prediction(&client, &id, &image_key);
            let _ = tx.send(JobMessage::PredictionDeleted(PredictionDeleteResult {
                result,
            }));
        });
    }

    pub(super) fn clear_prediction_delete(&mut self) {
        self.prediction_delete_in_progress = false;
    }

    pub(super) fn begin_models_refresh(&mut self, client: ApiClient) {
        if self.models_in_progress {
            return;
        }
        self.models_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::models::fetch_models(&client);
            let _ = tx.send(JobMessage::ModelsLoaded(ModelsResult { result }));
        });
    }

    pub(super) fn clear_models_refresh(&mut self) {
        self.models_in_progress = false;
    }

    pub(super) fn model_save_in_progress(&self) -> bool {
        self.model_save_in_progress
    }

    pub(super) fn begin_model_create(&mut self, job: ModelCreateJob) {
        if self.model_save_in_progress {
            return;
        }
        self.model_save_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = super::models::run_model_create_job(&job, move |sent, total| {
                let _ = progress_tx.send(JobMessage::UploadProgress(UploadProgressUpdate {
                    task: ProgressTaskKind::ModelSave,
                    sent,
                    total,
                }));
            });
            let _ = tx.send(JobMessage::ModelSaved(ModelSaveResult {
                created: true,
                result,
            }));
        });
    }

    pub(super) fn begin_model_edit(&mut self, client: ApiClient, id: String, update: ModelUpdate) {
        if self.model_save_in_progress {
            return;
        }
        self.model_save_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::models::update_model(&client, &id, &update);
            let _ = tx.send(JobMessage::ModelSaved(ModelSaveResult {
                created: false,
                result,
            }));
        });
    }

    pub(super) fn clear_model_save(&mut self) {
        self.model_save_in_progress = false;
    }

    pub(super) fn begin_model_delete(&mut self, client: ApiClient, id: String) {
        if self.model_delete_in_progress {
            return;
        }
        self.model_delete_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::models::delete_model(&client, &id);
            let _ = tx.send(JobMessage::ModelDeleted(ModelDeleteResult { result }));
        });
    }

    pub(super) fn clear_model_delete(&mut self) {
        self.model_delete_in_progress = false;
    }

    pub(super) fn begin_model_activate(&mut self, client: ApiClient, id: String) {
        if self.model_activate_in_progress {
            return;
        }
        self.model_activate_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::models::activate_model(&client, &id);
            let _ = tx.send(JobMessage::ModelActivated(ModelActivateResult { result }));
        });
    }

    pub(super) fn clear_model_activate(&mut self) {
        self.model_activate_in_progress = false;
    }

    pub(super) fn begin_stats(&mut self, client: ApiClient) {
        if self.stats_in_progress {
            return;
        }
        self.stats_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = super::dashboard::run_stats_job(&client);
            let _ = tx.send(JobMessage::StatsLoaded(StatsResult { result }));
        });
    }

    pub(super) fn clear_stats(&mut self) {
        self.stats_in_progress = false;
    }

    pub(super) fn begin_users(&mut self, client: ApiClient, query: UserQuery) {
        if self.users_in_progress {
            return;
        }
        self.users_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::users::fetch_users(&client, &query);
            let _ = tx.send(JobMessage::UsersLoaded(UsersResult { query, result }));
        });
    }

    pub(super) fn clear_users(&mut self) {
        self.users_in_progress = false;
    }

    pub(super) fn begin_user_detail(&mut self, client: ApiClient, user_id: String) {
        if self.user_detail_in_progress {
            return;
        }
        self.user_detail_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::users::fetch_user(&client, &user_id);
            let _ = tx.send(JobMessage::UserDetailLoaded(UserDetailResult {
                user_id,
                result,
            }));
        });
    }

    pub(super) fn clear_user_detail(&mut self) {
        self.user_detail_in_progress = false;
    }

    pub(super) fn begin_user_save(&mut self, client: ApiClient, id: String, update: UserUpdate) {
        if self.user_save_in_progress {
            return;
        }
        self.user_save_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::users::update_user(&client, &id, &update);
            let _ = tx.send(JobMessage::UserSaved(UserSaveResult { result }));
        });
    }

    pub(super) fn clear_user_save(&mut self) {
        self.user_save_in_progress = false;
    }

    pub(super) fn begin_user_delete(&mut self, client: ApiClient, id: String) {
        if self.user_delete_in_progress {
            return;
        }
        self.user_delete_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::users::delete_user(&client, &id);
            let _ = tx.send(JobMessage::UserDeleted(UserDeleteResult { result }));
        });
    }

    pub(super) fn clear_user_delete(&mut self) {
        self.user_delete_in_progress = false;
    }

    pub(super) fn begin_dataset_stats(&mut self, client: ApiClient) {
        if self.dataset_stats_in_progress {
            return;
        }
        self.dataset_stats_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = crate::api::dataset::fetch_class_stats(&client);
            let _ = tx.send(JobMessage::DatasetStatsLoaded(DatasetStatsResult { result }));
        });
    }

    pub(super) fn clear_dataset_stats(&mut self) {
        self.dataset_stats_in_progress = false;
    }

    pub(super) fn dataset_export_in_progress(&self) -> bool {
        self.dataset_export_in_progress
    }

    pub(super) fn begin_dataset_export(
        &mut self,
        client: ApiClient,
        request: crate::api::dataset::DatasetExportRequest,
        download_dir: PathBuf,
    ) {
        if self.dataset_export_in_progress {
            return;
        }
        self.dataset_export_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = super::dataset_export::run_dataset_export_job(
                &client,
                &request,
                &download_dir,
            );
            let _ = tx.send(JobMessage::DatasetExported(DatasetExportResult { result }));
        });
    }

    pub(super) fn clear_dataset_export(&mut self) {
        self.dataset_export_in_progress = false;
    }
}
