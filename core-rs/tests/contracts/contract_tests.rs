//! Contract Tests - Formatter Invariant Protection
//!
//! This file aggregates all contract test modules.
//! Contract tests verify invariants of the printed output that MUST NEVER BREAK.

mod contracts {
    // Required flag contracts
    mod required_flag {
        include!("required_flag_contracts.rs");
    }

    // Label resolution contracts
    mod label_resolution {
        include!("label_resolution_contracts.rs");
    }
}
