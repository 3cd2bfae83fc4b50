pub mod feature_flags;
pub mod fs_atomic;
pub mod paths;
pub mod preset_codec;
pub mod slug;
pub mod suggest;
pub mod text;
pub mod tool_errors;
