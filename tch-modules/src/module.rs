use crate::{
    common::*, conv_bn_2d::ConvBn2D, input::Input, inverted_bottleneck_2d::InvertedBottleneck2D,
    max_pool_2d::MaxPool2D, separable_conv_2d::SeparableConv2D, sum_2d::Sum2D,
    up_sample_2d::UpSample2D,
};

pub use module_::*;
mod module_ {
    use super::*;

    /// A node of the network instantiated on libtorch.
    #[derive(Debug, AsRefStr)]
    pub enum Module {
        Input(Input),
        ConvBn2D(ConvBn2D),
        SeparableConv2D(SeparableConv2D),
        InvertedBottleneck2D(InvertedBottleneck2D),
        MaxPool2D(MaxPool2D),
        UpSample2D(UpSample2D),
        Sum2D(Sum2D),
    }

    impl From<Input> for Module {
        fn from(v: Input) -> Self {
            Self::Input(v)
        }
    }

    impl From<ConvBn2D> for Module {
        fn from(v: ConvBn2D) -> Self {
            Self::ConvBn2D(v)
        }
    }

    impl From<SeparableConv2D> for Module {
        fn from(v: SeparableConv2D) -> Self {
            Self::SeparableConv2D(v)
        }
    }

    impl From<InvertedBottleneck2D> for Module {
        fn from(v: InvertedBottleneck2D) -> Self {
            Self::InvertedBottleneck2D(v)
        }
    }

    impl From<MaxPool2D> for Module {
        fn from(v: MaxPool2D) -> Self {
            Self::MaxPool2D(v)
        }
    }

    impl From<UpSample2D> for Module {
        fn from(v: UpSample2D) -> Self {
            Self::UpSample2D(v)
        }
    }

    impl From<Sum2D> for Module {
        fn from(v: Sum2D) -> Self {
            Self::Sum2D(v)
        }
    }

    impl Module {
        pub fn forward_t<'a>(
            &self,
            input: impl Into<ModuleInput<'a>>,
            train: bool,
        ) -> Result<Tensor> {
            let input = input.into();
            let single = || {
                input
                    .tensor()
                    .ok_or_else(|| format_err!("{} expects a single input", self.as_ref()))
            };

            let output = match self {
                Self::Input(module) => module.forward(single()?)?,
                Self::ConvBn2D(module) => module.forward_t(single()?, train),
                Self::SeparableConv2D(module) => module.forward_t(single()?, train),
                Self::InvertedBottleneck2D(module) => module.forward_t(single()?, train),
                Self::MaxPool2D(module) => module.forward(single()?)?,
                Self::UpSample2D(module) => module.forward(single()?)?,
                Self::Sum2D(module) => {
                    let tensors = input
                        .indexed_tensor()
                        .ok_or_else(|| format_err!("Sum2D expects indexed inputs"))?;
                    module.forward(tensors.iter().copied())?
                }
            };

            Ok(output)
        }
    }
}

pub use module_input::*;
mod module_input {
    use super::*;

    #[derive(Debug, Clone)]
    pub enum ModuleInput<'a> {
        None,
        Single(&'a Tensor),
        Indexed(Vec<&'a Tensor>),
    }

    impl<'a> ModuleInput<'a> {
        pub fn tensor(&self) -> Option<&'a Tensor> {
            match *self {
                Self::Single(tensor) => Some(tensor),
                _ => None,
            }
        }

        pub fn indexed_tensor(&self) -> Option<&[&'a Tensor]> {
            match self {
                Self::Indexed(tensors) => Some(tensors.as_slice()),
                _ => None,
            }
        }
    }

    impl<'a> From<&'a Tensor> for ModuleInput<'a> {
        fn from(from: &'a Tensor) -> Self {
            Self::Single(from)
        }
    }

    impl<'a, 'b> From<&'b [&'a Tensor]> for ModuleInput<'a> {
        fn from(from: &'b [&'a Tensor]) -> Self {
            Self::Indexed(from.to_vec())
        }
    }

    impl<'a> From<Vec<&'a Tensor>> for ModuleInput<'a> {
        fn from(from: Vec<&'a Tensor>) -> Self {
            Self::Indexed(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConvBn2DInit, UpSampleMode};
    use tch::kind::FLOAT_CPU;

    #[test]
    fn dispatch_by_input_kind() -> Result<()> {
        let vs = nn::VarStore::new(Device::Cpu);
        let input = Tensor::rand(&[1, 3, 8, 8], FLOAT_CPU);

        let conv: Module = ConvBn2DInit::new(3, 4, 3).build(&vs.root() / "conv").into();
        let output = conv.forward_t(&input, false)?;
        assert_eq!(output.size(), vec![1, 4, 8, 8]);

        let pool: Module = MaxPool2D::new(2, 2, 0)?.into();
        assert_eq!(pool.forward_t(&input, false)?.size(), vec![1, 3, 4, 4]);

        let up: Module = UpSample2D::new(2, UpSampleMode::Nearest)?.into();
        assert_eq!(up.forward_t(&input, false)?.size(), vec![1, 3, 16, 16]);

        let sum: Module = Sum2D::new().into();
        assert!(sum.forward_t(&input, false).is_err());
        let summed = sum.forward_t(vec![&input, &input], false)?;
        assert_eq!(summed.size(), vec![1, 3, 8, 8]);
        assert!(conv.forward_t(vec![&input, &input], false).is_err());
        Ok(())
    }
}
