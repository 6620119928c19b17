//! Built-in llama.cpp server parameter catalogue

use super::definition::{CustomFormat, ParameterDefinition, ValueType};
use super::registry::{Category, ParameterRegistry, RegistryError};

impl ParameterRegistry {
    /// Registry of the llama.cpp `llama-server` options exposed to operators
    pub fn llama_cpp() -> Result<Self, RegistryError> {
        ParameterRegistry::builder()
            .category(model_settings())
            .category(performance())
            .category(sampling())
            .category(speculative_decoding())
            .category(advanced())
            .build()
    }
}

fn model_settings() -> Category {
    Category::new(
        "modelSettings",
        "Model Settings",
        "Core model loading and configuration options",
    )
    .with_parameter(
        ParameterDefinition::text("model", "Model Path")
            .with_description("Path to the model GGUF file")
            .with_placeholder("/path/to/model.gguf")
            .with_cli_flag("--model")
            .with_value_type(ValueType::String)
            .required()
            .with_min_length(1),
    )
    .with_parameter(
        ParameterDefinition::number("ctx-size", "Context Size")
            .with_description("Context window size for the model")
            .with_default(2048)
            .with_range(1.0, 131072.0)
            .with_step(1.0)
            .with_cli_flag("-c, --ctx-size")
            .with_unit("tokens"),
    )
    .with_parameter(
        ParameterDefinition::number("ctx-checkpoints", "Context Checkpoints")
            .with_description("Number of KV cache checkpoints to save")
            .with_default(0)
            .with_min(0.0)
            .with_step(1.0)
            .with_cli_flag("--ctx-checkpoints"),
    )
    .with_parameter(
        ParameterDefinition::number("n-gpu-layers", "GPU Layers")
            .with_description("Number of layers to offload to GPU")
            .with_default(0)
            .with_range(0.0, 1000.0)
            .with_step(1.0)
            .with_cli_flag("-ngl, --n-gpu-layers"),
    )
    .with_parameter(
        ParameterDefinition::select("split-mode", "Split Mode")
            .with_description("How to split tensors across GPUs")
            .with_option("none", "None (single GPU)")
            .with_option("layer", "Layer (split by layers)")
            .with_option("row", "Row (split by rows)")
            .with_default("layer")
            .with_cli_flag("--split-mode")
            .with_allowed_values(["none", "layer", "row"]),
    )
    .with_parameter(
        ParameterDefinition::text("tensor-split", "Tensor Split")
            .with_description("Ratio for splitting tensors across GPUs (e.g., 1,1 or 0.5,0.5)")
            .with_placeholder("0.5,0.5,0.5,0.5")
            .with_cli_flag("--tensor-split")
            .with_format(CustomFormat::TensorSplit),
    )
    .with_parameter(
        ParameterDefinition::number("main-gpu", "Main GPU")
            .with_description("Main GPU for sequential processing")
            .with_default(0)
            .with_min(0.0)
            .with_step(1.0)
            .with_cli_flag("--main-gpu"),
    )
    .with_parameter(
        ParameterDefinition::boolean("load-on-startup", "Load on Startup")
            .with_description("Load model when server starts")
            .with_default(false)
            .with_cli_flag("--load-on-startup"),
    )
}

fn performance() -> Category {
    Category::new(
        "performance",
        "Performance",
        "Thread and memory settings for optimal performance",
    )
    .with_parameter(
        ParameterDefinition::number("threads", "Threads")
            .with_description("Number of threads to use (0 = auto-detect)")
            .with_default(0)
            .with_range(0.0, 128.0)
            .with_step(1.0)
            .with_cli_flag("-t, --threads"),
    )
    .with_parameter(
        ParameterDefinition::number("batch", "Batch Size")
            .with_description("Maximum batch size for prompt processing")
            .with_default(512)
            .with_range(1.0, 8192.0)
            .with_step(1.0)
            .with_cli_flag("-b, --batch"),
    )
    .with_parameter(
        ParameterDefinition::number("ubatch", "Micro Batch Size")
            .with_description("Micro batch size for continuous batching")
            .with_default(512)
            .with_range(1.0, 8192.0)
            .with_step(1.0)
            .with_cli_flag("--ubatch"),
    )
    .with_parameter(
        ParameterDefinition::number("cache-ram", "KV Cache RAM")
            .with_description("Maximum KV cache RAM to use (0 = unlimited)")
            .with_default(0)
            .with_min(0.0)
            .with_step(1.0)
            .with_cli_flag("--cache-ram")
            .with_unit("MB"),
    )
    .with_parameter(
        ParameterDefinition::number("threads-http", "HTTP Threads")
            .with_description("Number of threads for HTTP server")
            .with_default(1)
            .with_range(1.0, 32.0)
            .with_step(1.0)
            .with_cli_flag("--threads-http"),
    )
}

fn sampling() -> Category {
    Category::new("sampling", "Sampling", "Text generation and sampling parameters")
        .with_parameter(
            ParameterDefinition::number("temp", "Temperature")
                .with_description("Controls randomness in generation (0 = deterministic)")
                .with_default(0.7)
                .with_range(0.0, 2.0)
                .with_step(0.01)
                .with_cli_flag("--temp"),
        )
        .with_parameter(
            ParameterDefinition::number("seed", "Random Seed")
                .with_description("Random seed for reproducibility (-1 = random)")
                .with_default(-1)
                .with_range(-1.0, 2147483647.0)
                .with_step(1.0)
                .with_cli_flag("-s, --seed"),
        )
        .with_parameter(
            ParameterDefinition::number("top-p", "Top-P")
                .with_description("Nucleus sampling threshold (0-1)")
                .with_default(0.95)
                .with_range(0.0, 1.0)
                .with_step(0.01)
                .with_cli_flag("-topp, --top-p"),
        )
        .with_parameter(
            ParameterDefinition::number("top-k", "Top-K")
                .with_description("Limit token selection to top K most likely")
                .with_default(40)
                .with_range(1.0, 1000.0)
                .with_step(1.0)
                .with_cli_flag("-topk, --top-k"),
        )
        .with_parameter(
            ParameterDefinition::number("min-p", "Min-P")
                .with_description("Minimum probability threshold for token selection")
                .with_default(0.05)
                .with_range(0.0, 1.0)
                .with_step(0.01)
                .with_cli_flag("--min-p"),
        )
        .with_parameter(
            ParameterDefinition::select("mirostat", "Mirostat Mode")
                .with_description("Mirostat sampling mode (0=disabled, 1=Mirostat, 2=Mirostat 2.0)")
                .with_option("0", "Disabled")
                .with_option("1", "Mirostat 1.0")
                .with_option("2", "Mirostat 2.0")
                .with_default(0)
                .with_cli_flag("--mirostat")
                .with_allowed_values([0, 1, 2]),
        )
        .with_parameter(
            ParameterDefinition::number("mirostat-lr", "Mirostat Learning Rate")
                .with_description("Learning rate for Mirostat target entropy adjustment")
                .with_default(0.1)
                .with_range(0.001, 1.0)
                .with_step(0.001)
                .with_cli_flag("--mirostat-lr"),
        )
        .with_parameter(
            ParameterDefinition::number("mirostat-ent", "Mirostat Entropy")
                .with_description("Target entropy for Mirostat sampling")
                .with_default(5.0)
                .with_range(1.0, 20.0)
                .with_step(0.1)
                .with_cli_flag("--mirostat-ent"),
        )
        .with_parameter(
            ParameterDefinition::multiselect("samplers", "Samplers")
                .with_description("Order of samplers to apply")
                .with_option("mirostat", "Mirostat")
                .with_option("mirostat2", "Mirostat 2.0")
                .with_option("greedy", "Greedy")
                .with_option("dist", "Dist")
                .with_option("typical", "Typical")
                .with_option("topk", "TopK")
                .with_option("nucleus", "Nucleus (Top-P)")
                .with_option("epsilon", "Epsilon")
                .with_option("ypsilon", "Ypsilon")
                .with_option("tailfree", "Tail Free")
                .with_option("locallytypical", "Locally Typical")
                .with_option("grammar", "Grammar")
                .with_option("json", "JSON")
                .with_default(vec!["typical", "topk", "nucleus"])
                .with_cli_flag("--samplers")
                .with_value_type(ValueType::Array),
        )
}

fn speculative_decoding() -> Category {
    Category::new(
        "speculativeDecoding",
        "Speculative Decoding",
        "Draft model settings for speculative decoding",
    )
    .with_parameter(
        ParameterDefinition::number("draft-min", "Min Draft Tokens")
            .with_description("Minimum number of draft tokens to use")
            .with_default(4)
            .with_range(1.0, 100.0)
            .with_step(1.0)
            .with_cli_flag("--draft-min"),
    )
    .with_parameter(
        ParameterDefinition::number("draft-max", "Max Draft Tokens")
            .with_description("Maximum number of draft tokens to use")
            .with_default(16)
            .with_range(1.0, 100.0)
            .with_step(1.0)
            .with_cli_flag("--draft-max"),
    )
    .with_parameter(
        ParameterDefinition::number("draft-p-min", "Min Draft Probability")
            .with_description("Minimum probability for draft tokens")
            .with_default(0.0)
            .with_range(0.0, 1.0)
            .with_step(0.01)
            .with_cli_flag("--draft-p-min"),
    )
}

fn advanced() -> Category {
    Category::new("advanced", "Advanced", "Advanced configuration options")
        .with_parameter(
            ParameterDefinition::boolean("mmap", "Memory Map")
                .with_description("Use memory-mapped files for faster loading")
                .with_default(true)
                .with_cli_flag("--no-mmap")
                .inverted(),
        )
        .with_parameter(
            ParameterDefinition::boolean("mmp", "Memory Pool")
                .with_description("Use memory pooling for KV cache")
                .with_default(true)
                .with_cli_flag("--no-mmap")
                .inverted(),
        )
        .with_parameter(
            ParameterDefinition::number("presence-penalty", "Presence Penalty")
                .with_description("Penalty for token presence (negative = encourages repetition)")
                .with_default(0.0)
                .with_range(-2.0, 2.0)
                .with_step(0.01)
                .with_cli_flag("--presence-penalty"),
        )
        .with_parameter(
            ParameterDefinition::number("frequency-penalty", "Frequency Penalty")
                .with_description("Penalty for token frequency (negative = encourages repetition)")
                .with_default(0.0)
                .with_range(-2.0, 2.0)
                .with_step(0.01)
                .with_cli_flag("--frequency-penalty"),
        )
        .with_parameter(
            ParameterDefinition::number("repeat-penalty", "Repeat Penalty")
                .with_description("Penalty for token repetition")
                .with_default(1.0)
                .with_range(1.0, 2.0)
                .with_step(0.01)
                .with_cli_flag("--repeat-penalty"),
        )
}
