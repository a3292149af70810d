// crates/flexstake-core/src/amount.rs
//
// Base-unit amounts. FLX has 18 implied decimal places; the smallest unit is
// the "atom". All ledger arithmetic is unsigned fixed point in atoms.

/// Amount in atoms (the smallest unit of FLX).
pub type Atoms = u128;

/// Block height supplied by the execution environment.
pub type BlockHeight = u64;

/// Number of implied decimal places.
pub const DECIMALS: u32 = 18;

/// Number of atoms in one FLX. 1 FLX = 10^18 atoms.
pub const ATOMS_PER_FLX: Atoms = 1_000_000_000_000_000_000;
