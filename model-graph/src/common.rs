pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use log::{debug, info};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::{self, Display, Formatter},
    io::prelude::*,
    iter,
};
pub use tensor_shape::{Dim, Shape};
