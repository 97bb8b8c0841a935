//! IPv4 networks in CIDR notation.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IpSpaceError;

/// An IPv4 network, `network/prefix_len`, with host bits cleared.
///
/// ```
/// use ipspace::Ipv4Cidr;
///
/// let cidr: Ipv4Cidr = "10.1.2.3/16".parse().unwrap();
/// assert_eq!(cidr.to_string(), "10.1.0.0/16");
/// assert_eq!(cidr.size(), 65536);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Cidr {
    /// Creates a network from any address inside it. Host bits of `addr` are dropped.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::InvalidPrefix`] when `prefix_len` is above 32.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, IpSpaceError> {
        if prefix_len > 32 {
            return Err(IpSpaceError::InvalidPrefix(prefix_len));
        }
        Ok(Self {
            network: Ipv4Addr::from(u32::from(addr) & netmask(prefix_len)),
            prefix_len,
        })
    }

    /// First address of the network
    pub const fn network(self) -> Ipv4Addr {
        self.network
    }

    /// Number of leading network bits
    pub const fn prefix_len(self) -> u8 {
        self.prefix_len
    }

    /// Number of host bits, `32 - prefix_len`
    pub fn host_bits(self) -> u32 {
        32 - u32::from(self.prefix_len)
    }

    /// Number of addresses in the network
    pub fn size(self) -> u64 {
        1_u64 << self.host_bits()
    }

    /// First address as an integer
    pub fn first(self) -> u32 {
        u32::from(self.network)
    }

    /// Last address as an integer
    pub fn last(self) -> u32 {
        self.first() | !netmask(self.prefix_len)
    }

    /// Whether `addr` lies inside this network
    pub fn contains_addr(self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & netmask(self.prefix_len) == self.first()
    }

    /// Whether `other` lies entirely inside this network
    pub fn contains(self, other: Self) -> bool {
        other.prefix_len >= self.prefix_len && self.contains_addr(other.network)
    }

    /// Smallest network containing every one of `subnets`.
    pub fn supernet_of(subnets: &[Self]) -> Option<Self> {
        let (first, rest) = subnets.split_first()?;
        Some(rest.iter().fold(*first, |acc, &next| acc.common_supernet(next)))
    }

    fn common_supernet(self, other: Self) -> Self {
        let shared = u8::try_from((self.first() ^ other.first()).leading_zeros()).unwrap_or(32);
        let prefix_len = shared.min(self.prefix_len).min(other.prefix_len);
        Self {
            network: Ipv4Addr::from(self.first() & netmask(prefix_len)),
            prefix_len,
        }
    }
}

#[inline]
fn netmask(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = IpSpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IpSpaceError::InvalidCidr(s.to_string());
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let prefix_len: u8 = prefix.parse().map_err(|_| invalid())?;
        Self::new(addr, prefix_len)
    }
}

impl Serialize for Ipv4Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Cidr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
