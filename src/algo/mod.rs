/*!
# Graph Algorithms

This module provides a suite of **graph algorithms** built on top of the graph representations in this crate.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use graphtheory::algo::*;
```
and gain access to traversal, connectivity, shortest paths, spanning trees, flows, matchings,
colorings and many other classical graph routines.

Every algorithm is a struct that borrows the graph (`Algo::new(&graph)`), is configured with
setters and computed with `run(..)`, returning an output struct or a [`GraphError`].
Traversals are additionally provided as **iterators**, making it easy to consume results lazily.
*/

mod bipartite;
mod bridges;
mod closure;
mod coloring;
mod connectivity;
mod cover;
mod cycles;
mod dset;
mod edge_coloring;
mod euler;
mod flow;
mod hamilton;
mod iset;
mod matching;
mod mst;
mod paths;
mod topsort;
pub mod traversal;

use crate::{prelude::*, utils::*};

pub use bipartite::*;
pub use bridges::*;
pub use closure::*;
pub use coloring::*;
pub use connectivity::*;
pub use cover::*;
pub use cycles::*;
pub use dset::*;
pub use edge_coloring::*;
pub use euler::*;
pub use flow::*;
pub use hamilton::*;
pub use iset::*;
pub use matching::*;
pub use mst::*;
pub use paths::*;
pub use topsort::*;
pub use traversal::*;

pub(crate) use coloring::Saturation;

