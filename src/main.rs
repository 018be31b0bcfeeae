use std::sync::Arc;

use genbridge::logger::{self, LoggerConfig};
use genbridge::state::CategoryState;
use genbridge::transport::write_frames;
use genbridge::{
    ChannelTransport, EmitterConfig, GalleryCategory, GenerationMode, Image, Intent,
    RequestEmitter, RootState, StateStore, Store,
};
use log::LevelFilter;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::development().with_level(LevelFilter::Debug))?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = EmitterConfig::from_env()?;
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Log truncation: {} chars", config.log_truncate_len);
    log::info!(
        "   Activity mirroring: {}",
        if config.mirror_activity { "✅" } else { "❌" }
    );

    let store = Store::new(sample_state());
    let (transport, events) = ChannelTransport::new();

    let sink: Box<dyn AsyncWrite + Unpin + Send> = match &config.server_addr {
        Some(addr) => {
            log::info!("🔌 Connecting to {}", addr);
            Box::new(TcpStream::connect(addr.as_str()).await?)
        }
        None => {
            log::info!("📺 No GENBRIDGE_SERVER_ADDR set, writing frames to stdout");
            Box::new(tokio::io::stdout())
        }
    };
    let writer = tokio::spawn(write_frames(events, sink));

    let emitter = RequestEmitter::new(Arc::new(store.clone()), Arc::new(transport), &config);

    let first = store.snapshot().gallery.categories.result.images[0].clone();
    let intents = vec![
        Intent::FetchConfig,
        Intent::ListImages(GalleryCategory::Result),
        Intent::Generate(GenerationMode::Txt2Img),
        Intent::UpscaleImage(first.clone()),
        Intent::DeleteImage(first),
        Intent::PollNewImages(GalleryCategory::Result),
        Intent::Cancel,
    ];
    for intent in intents {
        if let Err(e) = emitter.handle(intent) {
            log::error!("❌ {}", e);
        }
    }

    log::info!("📝 Activity log:");
    for entry in &store.snapshot().system.log {
        println!("{}", logger::format_activity_entry(entry, true));
    }

    drop(emitter);
    let written = writer.await??;
    log::info!("🏁 {} frames written", written);
    Ok(())
}

fn sample_state() -> RootState {
    let mut state = RootState::default();
    state.generation.prompt = "a lighthouse on a cliff, stormy sea, oil painting".to_string();
    state.generation.negative_prompt = "blurry".to_string();
    state.postprocessing.upscaling_level = 2;
    state.system.is_connected = true;

    let images = (0..3)
        .map(|i| {
            let uuid = Uuid::new_v4().to_string();
            Image::new(uuid.clone(), format!("outputs/{}.png", uuid), GalleryCategory::Result)
                .with_thumbnail(format!("outputs/thumbnails/{}.webp", uuid))
                .with_mtime(1_700_000_000 + i)
        })
        .collect();
    state.gallery.categories.result = CategoryState::with_images(images);
    state
}
