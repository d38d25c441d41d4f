pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::IndexMap;
pub use itertools::Itertools as _;
pub use log::{debug, info};
pub use std::{borrow::Borrow, collections::HashMap};
pub use tch::{nn, Kind, Reduction, Tensor};
pub use tensor_shape::Shape;
