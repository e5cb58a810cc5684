// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// specific goal (preparing partitions or loading batches).
//
// Rules for this layer:
//   - No parsing or tensor code here
//   - No UI or argument handling here (that's Layer 1)
//   - Only workflow coordination
//
// Each use case owns an immutable config struct built from the
// CLI arguments.

// The split/merge preparation workflow
pub mod prepare_use_case;

// The dataset/loader construction workflow
pub mod load_use_case;
