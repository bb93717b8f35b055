//! Committee domain
//!
//! Pure types and logic behind the committee protocol. The rounds themselves
//! (invoking sources concurrently, timeouts) are orchestrated by the
//! application layer; everything that decides *what* the committee concludes
//! lives here so it can be tested without any I/O.
//!
//! # Protocol
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Round 1: Independent    each source sees the observation    │
//! │           failures abstain for the rest of the turn          │
//! │                          ↓                                   │
//! │  Round 2: Discussion     each survivor sees its peers'       │
//! │           Round-1 proposals; failures fall back to Round 1   │
//! │                          ↓                                   │
//! │  Round 3: Vote           group by (type, target), score,     │
//! │           break ties with the seeded TieBreakOrder           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod ordering;
pub mod parsing;
pub mod policy;
pub mod proposal;
pub mod vote;

pub use consensus::ConsensusResult;
pub use ordering::TieBreakOrder;
pub use parsing::{DEFAULT_CONFIDENCE, parse_proposal_json, parse_proposal_value};
pub use policy::ConsensusPolicy;
pub use proposal::{Proposal, ProposalDraft, ProposalRound};
pub use vote::{Tally, VoteGroup};
