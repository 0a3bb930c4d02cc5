// Core modules
pub mod batch_processor;
pub mod perceptual;
pub mod types;

// Expose the hasher and its building blocks
pub use perceptual::{
    compute_fingerprint, fingerprint_binary, fingerprint_from_file, fingerprint_from_memory,
    PerceptualHasher,
};

// Reexport core functionality
pub use batch_processor::{binarized_output_path, process_images, process_single_image};
pub use types::{
    BinaryImage, Fingerprint, ImageFingerprint, ProcessingSummary, BLACK, FINGERPRINT_BITS,
    FINGERPRINT_LEN, TARGET_SIZE, WHITE,
};
