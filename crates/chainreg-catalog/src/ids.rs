//! Chain IDs of the built-in networks.

pub const MAINNET: u64 = 1;
pub const SEPOLIA: u64 = 11_155_111;
pub const HOLESKY: u64 = 17_000;
pub const BASE: u64 = 8_453;
pub const OPTIMISM: u64 = 10;
pub const ARBITRUM_ONE: u64 = 42_161;
pub const ZKSYNC_ERA: u64 = 324;
pub const SCROLL: u64 = 534_352;
pub const ARBITRUM_NOVA: u64 = 42_170;
pub const POLYGON: u64 = 137;
pub const BERACHAIN_ARTIO: u64 = 80_085;
pub const AVALANCHE: u64 = 43_114;
pub const BNB: u64 = 56;
pub const GNOSIS: u64 = 100;
pub const CELO: u64 = 42_220;
pub const CORE: u64 = 1_116;
pub const LINEA: u64 = 59_144;
pub const FANTOM: u64 = 250;
pub const POLYGON_ZKEVM: u64 = 1_101;
pub const BLAST: u64 = 81_457;

/// Every built-in ID, in catalog order.
pub const ALL: [u64; 20] = [
    MAINNET,
    SEPOLIA,
    HOLESKY,
    BASE,
    OPTIMISM,
    ARBITRUM_ONE,
    ZKSYNC_ERA,
    SCROLL,
    ARBITRUM_NOVA,
    POLYGON,
    BERACHAIN_ARTIO,
    AVALANCHE,
    BNB,
    GNOSIS,
    CELO,
    CORE,
    LINEA,
    FANTOM,
    POLYGON_ZKEVM,
    BLAST,
];
