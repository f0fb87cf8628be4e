// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::fmt;

use crate::{Feature, Style};

/// Computes a style per feature, typically from its attributes.
pub trait ThemeStyle {
    /// Style for `feature`; `None` leaves the feature unstyled by this theme.
    fn style_for(&self, feature: &Feature) -> Option<Style>;
}

impl<F> ThemeStyle for F
where
    F: Fn(&Feature) -> Option<Style>,
{
    fn style_for(&self, feature: &Feature) -> Option<Style> {
        self(feature)
    }
}

/// The style a layer applies to its features before their own styles.
#[derive(Clone)]
pub enum LayerStyle {
    /// One style for every feature.
    Fixed(Style),
    /// A style computed per feature.
    Themed(Arc<dyn ThemeStyle + Send + Sync>),
}

impl fmt::Debug for LayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(style) => f.debug_tuple("Fixed").field(style).finish(),
            Self::Themed(_) => f.debug_tuple("Themed").finish_non_exhaustive(),
        }
    }
}

impl LayerStyle {
    /// Wraps a theme function.
    pub fn themed<T>(theme: T) -> Self
    where
        T: ThemeStyle + Send + Sync + 'static,
    {
        Self::Themed(Arc::new(theme))
    }

    /// Resolves the effective style for `feature`.
    pub fn resolve(&self, feature: &Feature) -> Option<Cow<'_, Style>> {
        match self {
            Self::Fixed(style) => Some(Cow::Borrowed(style)),
            Self::Themed(theme) => theme.style_for(feature).map(Cow::Owned),
        }
    }
}

impl From<Style> for LayerStyle {
    fn from(style: Style) -> Self {
        Self::Fixed(style)
    }
}
