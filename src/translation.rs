//! Maps a state snapshot plus a generation mode onto the three payload groups
//! the backend expects for `generateImage` and `stream`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::models::{
    EsrganParameters, FacetoolParameters, GenerationMode, GenerationParameters,
};
use crate::state::{
    BoundingBoxScaleMethod, CanvasState, GenerationState, InProgressImageType,
    PostprocessingState, RootState, SystemState,
};

/// Everything one translation call reads. Borrowed from a single snapshot.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequestConfig<'a> {
    pub generation_mode: GenerationMode,
    pub generation_state: &'a GenerationState,
    pub postprocessing_state: &'a PostprocessingState,
    pub canvas_state: &'a CanvasState,
    pub system_state: &'a SystemState,
    /// Used instead of the configured seed when seed randomization is on.
    pub random_seed: u32,
}

impl<'a> GenerationRequestConfig<'a> {
    /// Reads the `generation` and `postprocessing` slices.
    pub fn from_generation_slices(
        generation_mode: GenerationMode,
        state: &'a RootState,
        random_seed: u32,
    ) -> Self {
        Self {
            generation_mode,
            generation_state: &state.generation,
            postprocessing_state: &state.postprocessing,
            canvas_state: &state.canvas,
            system_state: &state.system,
            random_seed,
        }
    }

    /// Reads the legacy `options` slice instead.
    pub fn from_options_slice(
        generation_mode: GenerationMode,
        state: &'a RootState,
        random_seed: u32,
    ) -> Self {
        Self {
            generation_mode,
            generation_state: &state.options.generation,
            postprocessing_state: &state.options.postprocessing,
            canvas_state: &state.canvas,
            system_state: &state.system,
            random_seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedParameters {
    pub generation: GenerationParameters,
    pub esrgan: Option<EsrganParameters>,
    pub facetool: Option<FacetoolParameters>,
}

pub fn frontend_to_backend_parameters(config: &GenerationRequestConfig<'_>) -> TranslatedParameters {
    let generation = config.generation_state;
    let postprocessing = config.postprocessing_state;
    let system = config.system_state;
    let mode = config.generation_mode;

    let prompt = if generation.negative_prompt.is_empty() {
        generation.prompt.clone()
    } else {
        format!("{} [{}]", generation.prompt, generation.negative_prompt)
    };
    let seed = if generation.should_randomize_seed {
        config.random_seed
    } else {
        generation.seed
    };

    let mut params = GenerationParameters {
        prompt,
        iterations: generation.iterations,
        steps: generation.steps,
        cfg_scale: generation.cfg_scale,
        threshold: generation.threshold,
        perlin: generation.perlin,
        height: generation.height,
        width: generation.width,
        sampler_name: generation.sampler.clone(),
        seed,
        progress_images: system.should_display_in_progress_type == InProgressImageType::FullRes,
        progress_latents: system.should_display_in_progress_type == InProgressImageType::Latents,
        save_intermediates: system.save_intermediates_interval,
        generation_mode: mode,
        init_mask: String::new(),
        init_img: None,
        h_symmetry_time_pct: None,
        v_symmetry_time_pct: None,
        hires_fix: None,
        strength: None,
        seamless: None,
        fit: None,
        invert_mask: None,
        bounding_box: None,
        inpaint_width: None,
        inpaint_height: None,
        seam_size: None,
        seam_blur: None,
        seam_strength: None,
        seam_steps: None,
        tile_size: None,
        infill_method: None,
        force_outpaint: None,
        variation_amount: 0.0,
        with_variations: None,
        enable_image_debugging: None,
    };
    let mut esrgan = None;
    let mut facetool = None;

    if generation.should_use_symmetry {
        if generation.horizontal_symmetry_steps > 0 {
            params.h_symmetry_time_pct =
                Some(symmetry_pct(generation.horizontal_symmetry_steps, generation.steps));
        }
        if generation.vertical_symmetry_steps > 0 {
            params.v_symmetry_time_pct =
                Some(symmetry_pct(generation.vertical_symmetry_steps, generation.steps));
        }
    }

    if mode == GenerationMode::Txt2Img {
        params.hires_fix = Some(postprocessing.hires_fix);
        if postprocessing.hires_fix {
            params.strength = Some(postprocessing.hires_strength);
        }
    }

    if matches!(mode, GenerationMode::Txt2Img | GenerationMode::Img2Img) {
        params.seamless = Some(generation.seamless);

        if postprocessing.should_run_esrgan {
            esrgan = Some(EsrganParameters {
                level: postprocessing.upscaling_level,
                denoise_str: postprocessing.upscaling_denoising,
                strength: postprocessing.upscaling_strength,
            });
        }
        if postprocessing.should_run_facetool {
            facetool = Some(FacetoolParameters::new(
                postprocessing.facetool_type,
                postprocessing.facetool_strength,
                postprocessing.codeformer_fidelity,
            ));
        }
    }

    if mode == GenerationMode::Img2Img {
        if let Some(initial_image) = &generation.initial_image {
            params.init_img = Some(initial_image.url().to_string());
            params.strength = Some(generation.img2img_strength);
            params.fit = Some(generation.should_fit_to_width_height);
        }
    }

    if mode == GenerationMode::UnifiedCanvas {
        if let Some(base_layer) = &config.canvas_state.base_layer_png {
            apply_canvas_parameters(&mut params, generation, config.canvas_state, base_layer);
        }
    }

    if generation.should_generate_variations {
        params.variation_amount = generation.variation_amount;
        if !generation.seed_weights.is_empty() {
            params.with_variations = parse_seed_weights(&generation.seed_weights);
        }
    }

    if system.enable_image_debugging {
        params.enable_image_debugging = Some(true);
    }

    TranslatedParameters {
        generation: params,
        esrgan,
        facetool,
    }
}

fn apply_canvas_parameters(
    params: &mut GenerationParameters,
    generation: &GenerationState,
    canvas: &CanvasState,
    base_layer: &[u8],
) {
    params.init_mask = match (&canvas.mask_layer_png, canvas.is_mask_enabled) {
        (Some(mask), true) => png_data_url(mask),
        _ => String::new(),
    };
    params.init_img = Some(png_data_url(base_layer));
    params.fit = Some(false);
    params.strength = Some(generation.img2img_strength);
    params.invert_mask = Some(canvas.should_preserve_masked_area);
    params.bounding_box = Some(canvas.bounding_box());
    params.progress_images = false;

    if canvas.bounding_box_scale_method != BoundingBoxScaleMethod::None {
        params.inpaint_width = Some(canvas.scaled_bounding_box_dimensions.width);
        params.inpaint_height = Some(canvas.scaled_bounding_box_dimensions.height);
    }

    params.seam_size = Some(generation.seam_size);
    params.seam_blur = Some(generation.seam_blur);
    params.seam_strength = Some(generation.seam_strength);
    params.seam_steps = Some(generation.seam_steps);
    params.tile_size = Some(generation.tile_size);
    params.infill_method = Some(generation.infill_method.clone());
    params.force_outpaint = Some(false);
}

fn symmetry_pct(symmetry_steps: u32, steps: u32) -> f64 {
    (f64::from(symmetry_steps) / f64::from(steps)).clamp(0.0, 1.0)
}

pub fn png_data_url(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// Parses `"seed:weight,seed:weight"`. Returns `None` when any pair is malformed.
pub fn parse_seed_weights(raw: &str) -> Option<Vec<(u32, f64)>> {
    raw.split(',')
        .map(|pair| {
            let (seed, weight) = pair.trim().split_once(':')?;
            let seed = seed.trim();
            let weight = weight.trim();
            if seed.is_empty() || !seed.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let is_decimal = !weight.is_empty()
                && weight.chars().all(|c| c.is_ascii_digit() || c == '.')
                && weight.matches('.').count() <= 1
                && weight != ".";
            if !is_decimal {
                return None;
            }
            Some((seed.parse().ok()?, weight.parse().ok()?))
        })
        .collect()
}
