pub use anyhow::{ensure, format_err, Context as _, Error, Result};
pub use itertools::Itertools as _;
pub use log::debug;
pub use noisy_float::prelude::*;
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    borrow::{Borrow, Cow},
    fmt::{self, Display, Formatter},
    iter,
    path::Path,
    str::FromStr,
};
pub use strum::AsRefStr;
pub use tch_act::Activation;
pub use tensor_shape::{Dim, Shape};
