use crate::AnswerOption;

/// How a question's options are laid out.
///
/// Chosen once per question from the shape of its option list:
///
/// | options                          | layout          |
/// |----------------------------------|-----------------|
/// | exactly 2, exactly 1 with image  | `SharedImage`   |
/// | any other case with an image     | `ImageGrid`     |
/// | exactly 2, no images             | `TextPair`      |
/// | anything else                    | `TextStack`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One image shown above two text choices.
    SharedImage {
        /// Index (in server order) of the option that carries the image.
        image_option: usize,
    },

    /// One image+text card per option.
    ImageGrid,

    /// Two text cards side by side.
    TextPair,

    /// A vertical stack of text rows.
    TextStack,
}

impl Layout {
    /// Select the layout for an option list.
    pub fn for_options(options: &[AnswerOption]) -> Self {
        let image_count = options.iter().filter(|o| o.has_image()).count();

        match (options.len(), image_count) {
            (2, 1) => {
                let image_option = options.iter().position(AnswerOption::has_image).unwrap_or(0);
                Self::SharedImage { image_option }
            }
            (_, n) if n > 0 => Self::ImageGrid,
            (2, _) => Self::TextPair,
            _ => Self::TextStack,
        }
    }

    /// Check if this layout shows images.
    pub fn shows_images(&self) -> bool {
        matches!(self, Self::SharedImage { .. } | Self::ImageGrid)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SharedImage { .. } => "shared-image",
            Self::ImageGrid => "image-grid",
            Self::TextPair => "text-pair",
            Self::TextStack => "text-stack",
        }
    }
}
