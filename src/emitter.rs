use std::sync::Arc;

use rand::Rng;

use crate::activity::ActivityLogger;
use crate::config::EmitterConfig;
use crate::error::{EmitterError, Result};
use crate::intent::Intent;
use crate::models::{
    GalleryCategory, GenerationMode, Image, ModelConfig, ModelConversion, ModelMerge,
    PostprocessingRequest,
};
use crate::protocol::OutboundEvent;
use crate::readiness::{DefaultReadiness, ReadinessGate};
use crate::state::{Action, StateStore};
use crate::transport::Transport;
use crate::translation::{frontend_to_backend_parameters, GenerationRequestConfig};

/// One method per user intent. Every method applies its local mutations,
/// reads a fresh snapshot, builds the payload and hands it to the transport
/// without waiting for a reply.
#[derive(Clone)]
pub struct RequestEmitter {
    store: Arc<dyn StateStore>,
    transport: Arc<dyn Transport>,
    readiness: Arc<dyn ReadinessGate>,
    activity: ActivityLogger,
}

impl RequestEmitter {
    pub fn new(
        store: Arc<dyn StateStore>,
        transport: Arc<dyn Transport>,
        config: &EmitterConfig,
    ) -> Self {
        Self {
            store,
            transport,
            readiness: Arc::new(DefaultReadiness),
            activity: ActivityLogger::new(config),
        }
    }

    pub fn with_readiness(mut self, readiness: Arc<dyn ReadinessGate>) -> Self {
        self.readiness = readiness;
        self
    }

    /// Entry point for the presentation layer. Generation intents are refused
    /// with [`EmitterError::NotReady`] when the readiness gate says no.
    pub fn handle(&self, intent: Intent) -> Result<()> {
        if intent.is_gated() {
            if let Intent::Generate(mode) | Intent::StreamGenerate(mode) = &intent {
                let from_options = matches!(intent, Intent::StreamGenerate(_));
                let readiness = self
                    .readiness
                    .check(&self.store.snapshot(), *mode, from_options);
                if !readiness.is_ready {
                    log::warn!("Refusing {:?}: {}", intent, readiness.reasons.join(", "));
                    return Err(EmitterError::NotReady(readiness.reasons));
                }
            }
        }

        match intent {
            Intent::Generate(mode) => self.generate(mode),
            Intent::StreamGenerate(mode) => self.stream_generate(mode),
            Intent::UpscaleImage(image) => self.upscale_image(&image),
            Intent::RestoreFace(image) => self.restore_face(&image),
            Intent::DeleteImage(image) => self.delete_image(&image),
            Intent::ListImages(category) => self.list_images(category),
            Intent::PollNewImages(category) => self.poll_new_images(category),
            Intent::Cancel => self.cancel(),
            Intent::FetchConfig => self.fetch_config(),
            Intent::SearchModels(folder) => self.search_models(&folder),
            Intent::AddModel(config) => self.add_model(config),
            Intent::DeleteModel(name) => self.delete_model(&name),
            Intent::ConvertModel(conversion) => self.convert_model(conversion),
            Intent::MergeModels(merge) => self.merge_models(merge),
            Intent::ChangeModel(name) => self.change_model(&name),
            Intent::SaveStagingImage(url) => self.save_staging_image(&url),
            Intent::EmptyTempFolder => self.empty_temp_folder(),
        }
        Ok(())
    }

    pub fn generate(&self, mode: GenerationMode) {
        self.store.dispatch(Action::SetIsProcessing(true));
        let state = self.store.snapshot();
        let config = GenerationRequestConfig::from_generation_slices(mode, &state, random_seed());
        self.store.dispatch(Action::GenerationRequested);

        let params = frontend_to_backend_parameters(&config);
        let message = self
            .activity
            .generation_message("Image generation requested", &params);

        self.send(OutboundEvent::GenerateImage {
            generation: params.generation,
            esrgan: params.esrgan,
            facetool: params.facetool,
        });
        self.record(message);
    }

    /// Same pipeline as [`generate`](Self::generate) but reads the legacy
    /// options slice and goes out as `stream`.
    pub fn stream_generate(&self, mode: GenerationMode) {
        self.store.dispatch(Action::SetIsProcessing(true));
        let state = self.store.snapshot();
        let config = GenerationRequestConfig::from_options_slice(mode, &state, random_seed());
        self.store.dispatch(Action::GenerationRequested);

        let params = frontend_to_backend_parameters(&config);
        let message = self.activity.generation_message("stream requested", &params);

        self.send(OutboundEvent::Stream {
            generation: params.generation,
            esrgan: params.esrgan,
            facetool: params.facetool,
        });
        self.record(message);
    }

    pub fn upscale_image(&self, image: &Image) {
        self.store.dispatch(Action::SetIsProcessing(true));
        let state = self.store.snapshot();
        let postprocessing = &state.postprocessing;

        let request = PostprocessingRequest::upscale(
            postprocessing.upscaling_level,
            postprocessing.upscaling_denoising,
            postprocessing.upscaling_strength,
        );
        self.run_postprocessing(image, request);
    }

    pub fn restore_face(&self, image: &Image) {
        self.store.dispatch(Action::SetIsProcessing(true));
        let state = self.store.snapshot();
        let postprocessing = &state.postprocessing;

        let request = PostprocessingRequest::facetool(
            postprocessing.facetool_type,
            postprocessing.facetool_strength,
            postprocessing.codeformer_fidelity,
        );
        self.run_postprocessing(image, request);
    }

    fn run_postprocessing(&self, image: &Image, request: PostprocessingRequest) {
        let message = self.activity.postprocessing_message(image, &request);
        self.send(OutboundEvent::RunPostprocessing {
            image: image.clone(),
            request,
        });
        self.record(message);
    }

    /// Removes the image locally first; the server's confirmation is not awaited.
    pub fn delete_image(&self, image: &Image) {
        self.store.dispatch(Action::RemoveImage {
            uuid: image.uuid.clone(),
            category: image.category,
        });
        self.send(OutboundEvent::DeleteImage {
            url: image.url.clone(),
            thumbnail: image.thumbnail.clone(),
            uuid: image.uuid.clone(),
            category: image.category,
        });
    }

    pub fn list_images(&self, category: GalleryCategory) {
        let earliest_mtime = self
            .store
            .snapshot()
            .gallery
            .categories
            .get(category)
            .earliest_mtime;
        self.send(OutboundEvent::RequestImages {
            category,
            earliest_mtime,
        });
    }

    pub fn poll_new_images(&self, category: GalleryCategory) {
        let latest_mtime = self
            .store
            .snapshot()
            .gallery
            .categories
            .get(category)
            .latest_mtime;
        self.send(OutboundEvent::RequestLatestImages {
            category,
            latest_mtime,
        });
    }

    pub fn cancel(&self) {
        self.send(OutboundEvent::Cancel);
    }

    pub fn fetch_config(&self) {
        self.send(OutboundEvent::RequestSystemConfig);
    }

    pub fn search_models(&self, folder: &str) {
        self.send(OutboundEvent::SearchForModels {
            folder: folder.to_string(),
        });
    }

    pub fn add_model(&self, config: ModelConfig) {
        self.send(OutboundEvent::AddNewModel(config));
    }

    pub fn delete_model(&self, name: &str) {
        self.send(OutboundEvent::DeleteModel {
            name: name.to_string(),
        });
    }

    pub fn convert_model(&self, conversion: ModelConversion) {
        self.store.dispatch(Action::ModelConvertRequested);
        self.send(OutboundEvent::ConvertToDiffusers(conversion));
    }

    pub fn merge_models(&self, merge: ModelMerge) {
        self.store.dispatch(Action::ModelMergingRequested);
        self.send(OutboundEvent::MergeDiffusersModels(merge));
    }

    pub fn change_model(&self, name: &str) {
        self.store.dispatch(Action::ModelChangeRequested);
        self.send(OutboundEvent::RequestModelChange {
            name: name.to_string(),
        });
    }

    pub fn save_staging_image(&self, url: &str) {
        self.send(OutboundEvent::RequestSaveStagingAreaImageToGallery {
            url: url.to_string(),
        });
    }

    pub fn empty_temp_folder(&self) {
        self.send(OutboundEvent::RequestEmptyTempFolder);
    }

    /// Best effort. A closed transport is logged and otherwise ignored.
    fn send(&self, event: OutboundEvent) {
        let name = event.name();
        match self.transport.emit(event) {
            Ok(()) => log::debug!("Emitted {}", name),
            Err(e) => log::warn!("Could not emit {}: {}", name, e),
        }
    }

    fn record(&self, message: Result<String>) {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                log::error!("Failed to build activity log entry: {}", e);
                return;
            }
        };
        if self.activity.mirrors_to_logger() {
            log::info!("{}", message);
        }
        self.store
            .dispatch(Action::AddLogEntry(self.activity.entry(message)));
    }
}

/// Backend seeds span numpy's full `u32` range.
fn random_seed() -> u32 {
    rand::thread_rng().gen()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FacetoolType, InitialImage, MergeInterpolation};
    use crate::state::{CategoryState, RootState, Store};
    use crate::transport::{RecordingTransport, TransportError};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    fn image(uuid: &str, url: &str, mtime: i64) -> Image {
        Image::new(uuid, url, GalleryCategory::Result).with_mtime(mtime)
    }

    fn base_state() -> RootState {
        let mut state = RootState::default();
        state.generation.prompt = "a quiet harbour".into();
        state.generation.seed = 1234;
        state.generation.should_randomize_seed = false;
        state.options.generation = state.generation.clone();
        state.system.is_connected = true;
        state.gallery.categories.result =
            CategoryState::with_images(vec![image("u1", "a.png", 10), image("u2", "b.png", 20)]);
        state
    }

    fn setup(state: RootState) -> (RequestEmitter, Store, RecordingTransport) {
        let store = Store::new(state);
        let transport = RecordingTransport::new();
        let emitter = RequestEmitter::new(
            Arc::new(store.clone()),
            Arc::new(transport.clone()),
            &EmitterConfig::default().with_activity_mirroring(false),
        );
        (emitter, store, transport)
    }

    fn last_log(store: &Store) -> String {
        store
            .snapshot()
            .system
            .log
            .last()
            .map(|entry| entry.message.clone())
            .unwrap_or_default()
    }

    #[test]
    fn generate_sends_full_image_but_logs_truncated_copy() {
        let init = format!("data:image/png;base64,{}", "x".repeat(2048));
        let mut state = base_state();
        state.generation.initial_image = Some(InitialImage::Url(init.clone()));
        let (emitter, store, transport) = setup(state);

        emitter.generate(GenerationMode::Img2Img);

        match transport.last() {
            Some(OutboundEvent::GenerateImage { generation, .. }) => {
                assert_eq!(generation.init_img.as_deref(), Some(init.as_str()));
            }
            other => panic!("unexpected event {:?}", other),
        }

        let message = last_log(&store);
        let expected = format!(r#""init_img":"{}...""#, &init[..64]);
        assert!(message.starts_with("Image generation requested: "));
        assert!(message.contains(&expected));
        assert!(!message.contains(&init));
    }

    #[test]
    fn canvas_mask_is_truncated_only_in_log() {
        let mut state = base_state();
        state.canvas.base_layer_png = Some(vec![7; 300]);
        state.canvas.mask_layer_png = Some(vec![9; 300]);
        state.canvas.is_mask_enabled = true;
        let (emitter, store, transport) = setup(state);

        emitter.generate(GenerationMode::UnifiedCanvas);

        let Some(OutboundEvent::GenerateImage { generation, .. }) = transport.last() else {
            panic!("expected generateImage");
        };
        assert!(generation.init_mask.len() > 300);

        let logged: Value = serde_json::from_str(
            last_log(&store).trim_start_matches("Image generation requested: "),
        )
        .unwrap();
        let logged_mask = logged["init_mask"].as_str().unwrap();
        assert_eq!(logged_mask, format!("{}...", &generation.init_mask[..64]));
    }

    #[test]
    fn generate_marks_processing_before_emitting() {
        struct Probe {
            store: Store,
            seen: Mutex<Vec<bool>>,
        }
        impl Transport for Probe {
            fn emit(&self, _event: OutboundEvent) -> std::result::Result<(), TransportError> {
                let processing = self.store.snapshot().system.is_processing;
                self.seen.lock().unwrap().push(processing);
                Ok(())
            }
        }

        let store = Store::new(base_state());
        let probe = Arc::new(Probe {
            store: store.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let emitter =
            RequestEmitter::new(Arc::new(store.clone()), probe.clone(), &EmitterConfig::default());

        emitter.generate(GenerationMode::Txt2Img);

        assert_eq!(*probe.seen.lock().unwrap(), vec![true]);
        assert_eq!(store.snapshot().system.current_status, "Preparing");
    }

    #[test]
    fn delete_removes_image_before_emitting() {
        struct Probe {
            store: Store,
            present_at_emit: Mutex<Option<bool>>,
        }
        impl Transport for Probe {
            fn emit(&self, _event: OutboundEvent) -> std::result::Result<(), TransportError> {
                let present = self
                    .store
                    .snapshot()
                    .gallery
                    .contains(GalleryCategory::Result, "u1");
                *self.present_at_emit.lock().unwrap() = Some(present);
                Ok(())
            }
        }

        let store = Store::new(base_state());
        let probe = Arc::new(Probe {
            store: store.clone(),
            present_at_emit: Mutex::new(None),
        });
        let emitter =
            RequestEmitter::new(Arc::new(store.clone()), probe.clone(), &EmitterConfig::default());

        emitter.delete_image(&image("u1", "a.png", 10));

        assert_eq!(*probe.present_at_emit.lock().unwrap(), Some(false));
    }

    #[test]
    fn delete_then_list_needs_no_confirmation() {
        let (emitter, store, transport) = setup(base_state());
        let target = image("u1", "a.png", 10);

        emitter.delete_image(&target);
        emitter.list_images(GalleryCategory::Result);

        assert!(!store.snapshot().gallery.contains(GalleryCategory::Result, "u1"));
        assert_eq!(transport.names(), vec!["deleteImage", "requestImages"]);
        assert_eq!(
            transport.events()[0],
            OutboundEvent::DeleteImage {
                url: "a.png".into(),
                thumbnail: "a.png".into(),
                uuid: "u1".into(),
                category: GalleryCategory::Result,
            }
        );
        assert_eq!(
            transport.events()[1],
            OutboundEvent::RequestImages {
                category: GalleryCategory::Result,
                earliest_mtime: Some(10),
            }
        );
        assert!(store.snapshot().system.log.is_empty());
    }

    #[test]
    fn poll_uses_latest_watermark() {
        let (emitter, _store, transport) = setup(base_state());
        emitter.poll_new_images(GalleryCategory::Result);
        emitter.poll_new_images(GalleryCategory::User);
        assert_eq!(
            transport.events(),
            vec![
                OutboundEvent::RequestLatestImages {
                    category: GalleryCategory::Result,
                    latest_mtime: Some(20),
                },
                OutboundEvent::RequestLatestImages {
                    category: GalleryCategory::User,
                    latest_mtime: None,
                },
            ]
        );
    }

    #[test]
    fn generate_and_stream_share_payload_shape() {
        let mut state = base_state();
        state.postprocessing.should_run_facetool = true;
        state.options.postprocessing = state.postprocessing.clone();
        let (emitter, store, transport) = setup(state);

        emitter.generate(GenerationMode::Txt2Img);
        let generate_log = last_log(&store);
        emitter.stream_generate(GenerationMode::Txt2Img);
        let stream_log = last_log(&store);

        let events = transport.events();
        assert_eq!(transport.names(), vec!["generateImage", "stream"]);
        assert_eq!(events[0].args().unwrap(), events[1].args().unwrap());
        assert_eq!(
            generate_log.trim_start_matches("Image generation requested: "),
            stream_log.trim_start_matches("stream requested: ")
        );
    }

    #[test]
    fn stream_reads_options_slice() {
        let mut state = base_state();
        state.options.generation.prompt = "from the options panel".into();
        let (emitter, _store, transport) = setup(state);

        emitter.stream_generate(GenerationMode::Txt2Img);

        let Some(OutboundEvent::Stream { generation, .. }) = transport.last() else {
            panic!("expected stream");
        };
        assert_eq!(generation.prompt, "from the options panel");
    }

    #[test]
    fn stream_sends_full_image_but_logs_truncated_copy() {
        let init = format!("data:image/png;base64,{}", "y".repeat(505));
        let mut state = base_state();
        state.options.generation.initial_image = Some(InitialImage::Url(init.clone()));
        let (emitter, store, transport) = setup(state);

        emitter.stream_generate(GenerationMode::Img2Img);

        match transport.last() {
            Some(OutboundEvent::Stream { generation, .. }) => {
                assert_eq!(generation.init_img.as_deref(), Some(init.as_str()));
            }
            other => panic!("unexpected event {:?}", other),
        }

        let message = last_log(&store);
        let expected = format!(r#""init_img":"{}...""#, &init[..64]);
        assert!(message.starts_with("stream requested: "));
        assert!(message.contains(&expected));
        assert!(!message.contains(&init));
    }

    #[test]
    fn upscale_matches_documented_example() {
        let mut state = base_state();
        state.postprocessing.upscaling_level = 2;
        state.postprocessing.upscaling_denoising = 0.75;
        state.postprocessing.upscaling_strength = 0.4;
        let (emitter, store, transport) = setup(state);
        let target = image("u1", "a.png", 10);

        emitter.upscale_image(&target);

        let event = transport.last().unwrap();
        assert_eq!(event.name(), "runPostprocessing");
        let args = event.args().unwrap();
        assert_eq!(args[0]["url"], json!("a.png"));
        assert_eq!(args[0]["uuid"], json!("u1"));
        assert_eq!(args[1], json!({"type": "esrgan", "upscale": [2, 0.75, 0.4]}));

        let message = last_log(&store);
        assert!(message.contains(r#""file":"a.png""#));
        assert!(message.contains(r#""upscale":[2,0.75,0.4]"#));
        assert!(store.snapshot().system.is_processing);
    }

    #[test]
    fn restore_face_fidelity_only_for_codeformer() {
        let mut state = base_state();
        state.postprocessing.facetool_type = FacetoolType::Gfpgan;
        let (emitter, store, transport) = setup(state);
        let target = image("u2", "b.png", 20);

        emitter.restore_face(&target);
        let gfpgan = transport.last().unwrap().args().unwrap();
        assert!(gfpgan[1].get("codeformer_fidelity").is_none());
        assert_eq!(gfpgan[1]["type"], json!("gfpgan"));

        let mut next = (*store.snapshot()).clone();
        next.postprocessing.facetool_type = FacetoolType::Codeformer;
        next.postprocessing.codeformer_fidelity = 0.3;
        let (emitter, store, transport) = setup(next);

        emitter.restore_face(&target);
        let codeformer = transport.last().unwrap().args().unwrap();
        assert_eq!(codeformer[1]["codeformer_fidelity"], json!(0.3));
        assert_eq!(codeformer[1]["type"], json!("codeformer"));
        assert!(last_log(&store).starts_with("Face restoration (codeformer) requested: "));
    }

    #[test]
    fn repeated_requests_are_not_coalesced() {
        let (emitter, store, transport) = setup(base_state());
        let target = image("u1", "a.png", 10);

        emitter.upscale_image(&target);
        emitter.upscale_image(&target);
        emitter.generate(GenerationMode::Txt2Img);
        emitter.generate(GenerationMode::Txt2Img);

        assert_eq!(
            transport.names(),
            vec![
                "runPostprocessing",
                "runPostprocessing",
                "generateImage",
                "generateImage"
            ]
        );
        assert_eq!(store.snapshot().system.log.len(), 4);
    }

    #[test]
    fn model_jobs_mark_status() {
        let (emitter, store, transport) = setup(base_state());

        emitter.convert_model(ModelConversion::to_root("sd-1.5"));
        assert_eq!(store.snapshot().system.current_status, "Converting Model");

        emitter.merge_models(ModelMerge {
            models_to_merge: vec!["a".into(), "b".into()],
            alpha: 0.5,
            interp: MergeInterpolation::WeightedSum,
            force: false,
            merged_model_name: "ab".into(),
            model_merge_save_path: None,
        });
        assert_eq!(store.snapshot().system.current_status, "Merging Models");

        emitter.change_model("sd-2");
        let system = store.snapshot().system.clone();
        assert_eq!(system.current_status, "Loading Model");
        assert!(!system.is_cancelable);
        assert!(system.is_processing);

        assert_eq!(
            transport.names(),
            vec!["convertToDiffusers", "mergeDiffusersModels", "requestModelChange"]
        );
    }

    #[test]
    fn plain_requests_do_not_touch_state() {
        let (emitter, store, transport) = setup(base_state());
        let before = store.snapshot();

        emitter.cancel();
        emitter.fetch_config();
        emitter.search_models("/models");
        emitter.add_model(ModelConfig::diffusers("sd-2", "stabilityai/sd-2"));
        emitter.delete_model("sd-1.4");
        emitter.save_staging_image("outputs/staging/1.png");
        emitter.empty_temp_folder();

        assert_eq!(*store.snapshot(), *before);
        assert_eq!(
            transport.names(),
            vec![
                "cancel",
                "requestSystemConfig",
                "searchForModels",
                "addNewModel",
                "deleteModel",
                "requestSaveStagingAreaImageToGallery",
                "requestEmptyTempFolder"
            ]
        );
        assert_eq!(
            transport.events()[2].args().unwrap(),
            vec![json!("/models")]
        );
    }

    #[test]
    fn handle_refuses_generation_when_not_ready() {
        let mut state = base_state();
        state.system.is_connected = false;
        let (emitter, store, transport) = setup(state);

        let result = emitter.handle(Intent::Generate(GenerationMode::Txt2Img));

        assert!(matches!(result, Err(EmitterError::NotReady(ref reasons)) if reasons == &vec!["System Disconnected".to_string()]));
        assert!(transport.events().is_empty());
        assert!(!store.snapshot().system.is_processing);

        emitter.handle(Intent::Cancel).unwrap();
        assert_eq!(transport.names(), vec!["cancel"]);
    }

    #[test]
    fn handle_routes_ready_generation() {
        let (emitter, _store, transport) = setup(base_state());
        emitter
            .handle(Intent::StreamGenerate(GenerationMode::Txt2Img))
            .unwrap();
        emitter
            .handle(Intent::PollNewImages(GalleryCategory::Result))
            .unwrap();
        assert_eq!(transport.names(), vec!["stream", "requestLatestImages"]);
    }

    #[test]
    fn closed_transport_still_applies_mutations() {
        struct Closed;
        impl Transport for Closed {
            fn emit(&self, event: OutboundEvent) -> std::result::Result<(), TransportError> {
                Err(TransportError::Closed(event.name()))
            }
        }

        let store = Store::new(base_state());
        let emitter =
            RequestEmitter::new(Arc::new(store.clone()), Arc::new(Closed), &EmitterConfig::default());

        emitter.delete_image(&image("u2", "b.png", 20));
        emitter.generate(GenerationMode::Txt2Img);

        let state = store.snapshot();
        assert!(!state.gallery.contains(GalleryCategory::Result, "u2"));
        assert!(state.system.is_processing);
        assert_eq!(state.system.log.len(), 1);
    }
}
