//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Scout Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The API key is never read from this file: set GOOGLE_API_KEY or GEMINI_API_KEY.

[model]
# name = "gemini-2.5-pro"
# system_instruction = "Concisely answer questions, referring to reliable sources. ..."
# tools = ["google_search", "url_context"]   # google_search, url_context, google_search_retrieval
# temperature = 1.0          # 0.0-2.0
# max_output_tokens = 8192   # 1-65536
# thinking_budget = -1       # -1 = dynamic, 0 = off
# dynamic_threshold = 0.3    # 0.0-1.0, google_search_retrieval only

[api]
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"
# connect_timeout_secs = 10  # 1-60
# request_timeout_secs = 120 # 5-600

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
