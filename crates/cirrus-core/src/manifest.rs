//! Declared assets
//!
//! The static table of model weights the agent guarantees on the volume and
//! the one plugin it manages at runtime.

use serde::Serialize;

/// Plugin whose checkout the agent keeps up to date at runtime
pub const MANAGED_PLUGIN: &str = "ComfyUI-Manager";

/// One weight file to fetch if missing
///
/// A task is satisfied iff a file of the expected name exists at the expected
/// destination; satisfied tasks are skipped without any fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelTask {
    /// Destination subdirectory under the models root
    pub category: &'static str,
    /// Expected filename
    pub filename: &'static str,
    /// Hub repository identifier
    pub repo: &'static str,
    /// Optional subfolder inside the repository
    pub subfolder: Option<&'static str>,
}

impl ModelTask {
    /// Path of the file inside its repository
    pub fn repo_path(&self) -> String {
        match self.subfolder {
            Some(subfolder) => format!("{}/{}", subfolder, self.filename),
            None => self.filename.to_string(),
        }
    }
}

/// The declared model tasks, fixed at build time
pub fn model_tasks() -> &'static [ModelTask] {
    const TASKS: &[ModelTask] = &[
        ModelTask {
            category: "unet/FLUX",
            filename: "flux1-dev-Q8_0.gguf",
            repo: "city96/FLUX.1-dev-gguf",
            subfolder: None,
        },
        ModelTask {
            category: "clip/FLUX",
            filename: "t5-v1_1-xxl-encoder-Q8_0.gguf",
            repo: "city96/t5-v1_1-xxl-encoder-gguf",
            subfolder: None,
        },
        ModelTask {
            category: "clip/FLUX",
            filename: "clip_l.safetensors",
            repo: "comfyanonymous/flux_text_encoders",
            subfolder: None,
        },
        ModelTask {
            category: "checkpoints",
            filename: "flux1-dev-fp8-all-in-one.safetensors",
            repo: "camenduru/FLUX.1-dev",
            subfolder: None,
        },
        ModelTask {
            category: "loras",
            filename: "mjV6.safetensors",
            repo: "strangerzonehf/Flux-Midjourney-Mix2-LoRA",
            subfolder: None,
        },
        ModelTask {
            category: "vae/FLUX",
            filename: "ae.safetensors",
            repo: "ffxvs/vae-flux",
            subfolder: None,
        },
    ];
    TASKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_declared_tasks() {
        assert_eq!(model_tasks().len(), 6);
    }

    #[test]
    fn test_repo_path_with_subfolder() {
        let task = ModelTask {
            category: "clip",
            filename: "model.safetensors",
            repo: "org/repo",
            subfolder: Some("text_encoder"),
        };
        assert_eq!(task.repo_path(), "text_encoder/model.safetensors");

        let task = ModelTask {
            subfolder: None,
            ..task
        };
        assert_eq!(task.repo_path(), "model.safetensors");
    }
}
