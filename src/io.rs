//! File-level operations around the frame codec: the `.lhe` container,
//! uncompressed image formats and the encode / decode / info entry points
//! used by the CLI.

pub mod color;
pub mod container;
pub mod decode_file;
pub mod encode_file;
pub mod file_info;
pub mod file_io;
pub mod image;

pub use container::{is_container, read_container, write_container, ContainerFrame, LHE_MAGIC};
pub use decode_file::{decode_container, decode_file, DecodeStats};
pub use encode_file::{encode_file, encode_frames, load_frames, EncodeOptions, EncodeStats};
pub use file_info::{container_info, display_files_info, ContainerInfo, FrameInfo};
pub use image::{encode_pnm, parse_pnm, read_yuv_frames, write_yuv_frame, ImageFormat};
