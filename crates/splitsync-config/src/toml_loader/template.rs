//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# splitsync configuration
# Only override what you want to change -- missing fields use defaults.

schema_version = 1

[connection]
# socket_path = "/run/user/1000/splitsync.sock"   # default: runtime dir or temp dir
# reconnect_backoff_ms = 1000    # 100-60000, connecting side only
# max_frame_bytes = 4194304      # 1024-67108864

[sync]
# echo_cooldown_ms = 100         # 0-5000
# distribution = "round_robin"   # round_robin, all_to_every_leaf, visible_only
# size_tolerance = 0.01          # 0.0-0.5
# ignore_patterns = ['\.git/', '^/tmp/']
# initial_sync = "listener"      # listener, connector, both, none

[logging]
# level = "INFO"                 # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
