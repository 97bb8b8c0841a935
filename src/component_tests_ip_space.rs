//! Component tests for `IpSpace` - placement of addresses and subnets on the grid
