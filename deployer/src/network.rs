//! The networks vaults can be deployed to

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::constants::DEFAULT_CALL_FEE;

/// The possible deployment target networks
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// BNB Smart Chain
    Bsc,
    /// Huobi ECO Chain
    Heco,
    /// Avalanche C-Chain
    Avax,
    /// Polygon PoS
    Polygon,
    /// Fantom Opera
    Fantom,
    /// Harmony
    One,
    /// Arbitrum One
    Arbitrum,
    /// Moonriver
    Moonriver,
    /// Celo
    Celo,
    /// Cronos
    Cronos,
    /// Aurora
    Aurora,
    /// Fuse
    Fuse,
    /// Metis Andromeda
    Metis,
    /// Moonbeam
    Moonbeam,
    /// A local development node
    Localhost,
}

impl Network {
    /// The EIP-155 chain ID of the network
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Bsc => 56,
            Network::Heco => 128,
            Network::Avax => 43114,
            Network::Polygon => 137,
            Network::Fantom => 250,
            Network::One => 1_666_600_000,
            Network::Arbitrum => 42161,
            Network::Moonriver => 1285,
            Network::Celo => 42220,
            Network::Cronos => 25,
            Network::Aurora => 1_313_161_554,
            Network::Fuse => 122,
            Network::Metis => 1088,
            Network::Moonbeam => 1284,
            Network::Localhost => 31337,
        }
    }

    /// The call fee a strategy on this network is expected to carry
    pub fn call_fee(&self) -> u64 {
        match self {
            Network::Avax => 57,
            Network::Polygon | Network::Heco | Network::Fantom | Network::One => 11,
            _ => DEFAULT_CALL_FEE,
        }
    }

    /// Whether deployments on this network are registered with the subsidy registry
    pub fn is_subsidy_chain(&self) -> bool {
        matches!(self, Network::Bsc)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Bsc => write!(f, "bsc"),
            Network::Heco => write!(f, "heco"),
            Network::Avax => write!(f, "avax"),
            Network::Polygon => write!(f, "polygon"),
            Network::Fantom => write!(f, "fantom"),
            Network::One => write!(f, "one"),
            Network::Arbitrum => write!(f, "arbitrum"),
            Network::Moonriver => write!(f, "moonriver"),
            Network::Celo => write!(f, "celo"),
            Network::Cronos => write!(f, "cronos"),
            Network::Aurora => write!(f, "aurora"),
            Network::Fuse => write!(f, "fuse"),
            Network::Metis => write!(f, "metis"),
            Network::Moonbeam => write!(f, "moonbeam"),
            Network::Localhost => write!(f, "localhost"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::Network;

    #[test]
    fn test_only_bsc_is_subsidy_chain() {
        let subsidy_chains: Vec<_> = Network::value_variants()
            .iter()
            .filter(|n| n.is_subsidy_chain())
            .collect();
        assert_eq!(subsidy_chains, vec![&Network::Bsc]);
    }

    #[test]
    fn test_display_matches_cli_name() {
        for network in Network::value_variants() {
            let parsed = Network::from_str(&network.to_string(), false /* ignore_case */);
            assert_eq!(parsed, Ok(*network));
        }
    }

    #[test]
    fn test_call_fees() {
        assert_eq!(Network::Bsc.call_fee(), 111);
        assert_eq!(Network::Avax.call_fee(), 57);
        assert_eq!(Network::Fantom.call_fee(), 11);
        assert_eq!(Network::Cronos.call_fee(), 111);
    }
}
