use leptos::prelude::*;
use mindtrack_frontend::App;
use mindtrack_frontend::config::AppConfig;

// lol_alloc 作为全局分配器，减小 WASM 体积
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();

    let (config, warnings) = AppConfig::load();
    mindtrack_frontend::logging::init(&config.log_level);
    for warning in warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(api_url = %config.api_url, "starting mind track");

    mount_to_body(move || view! { <App config=config.clone() /> });
}
