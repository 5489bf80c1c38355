use {
    crate::error::{ConstructorError, Error},
    alloy::{
        dyn_abi::{JsonAbiExt, Specifier},
        json_abi::JsonAbi,
        primitives::Bytes,
    },
    serde::Deserialize,
    std::path::Path,
};

/// The part of a compiled contract build artifact that is needed to deploy
/// it. Build tools write many more fields which are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl Artifact {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read_to_string(path).map_err(|source| Error::File {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&data, path)
    }

    fn from_json(data: &str, path: &Path) -> Result<Self, Error> {
        let artifact: Self = serde_json::from_str(data).map_err(|source| Error::Parse {
            path: path.to_owned(),
            source,
        })?;
        if artifact.bytecode.is_empty() {
            return Err(Error::EmptyBytecode {
                path: path.to_owned(),
            });
        }
        Ok(artifact)
    }

    /// Returns the code of the contract creation transaction: the bytecode
    /// followed by the ABI encoded constructor arguments.
    ///
    /// Every argument is parsed into the Solidity type the ABI declares for
    /// the constructor input at the same position.
    pub fn creation_code(&self, args: &[String]) -> Result<Bytes, ConstructorError> {
        let Some(constructor) = self.abi.constructor() else {
            if !args.is_empty() {
                return Err(ConstructorError::ArgumentCount {
                    expected: 0,
                    actual: args.len(),
                });
            }
            return Ok(self.bytecode.clone());
        };

        if constructor.inputs.len() != args.len() {
            return Err(ConstructorError::ArgumentCount {
                expected: constructor.inputs.len(),
                actual: args.len(),
            });
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| {
                let argument_error = |source| ConstructorError::Argument {
                    index,
                    name: param.name.clone(),
                    ty: param.ty.clone(),
                    source,
                };
                param
                    .resolve()
                    .and_then(|ty| ty.coerce_str(arg))
                    .map_err(argument_error)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let encoded = constructor
            .abi_encode_input(&values)
            .map_err(ConstructorError::Encoding)?;
        Ok([self.bytecode.as_ref(), encoded.as_slice()].concat().into())
    }
}
