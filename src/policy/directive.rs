//! Directive registry.
//!
//! # Responsibilities
//! - Name every directive the policy model knows about
//! - Pin the canonical encode order
//! - Map each directive to its slot on [`Policy`]
//!
//! # Design Decisions
//! - The registry is a static table, so the canonical order is data that
//!   tests can inspect directly
//! - `default-src` leads, the remaining fetch directives follow
//!   alphabetically, `report-to` closes the header

use std::fmt;
use std::str::FromStr;

use super::{Policy, SourceList};

/// A CSP directive known to the policy model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    ChildSrc,
    ConnectSrc,
    DefaultSrc,
    FontSrc,
    FrameSrc,
    ImgSrc,
    ManifestSrc,
    MediaSrc,
    ObjectSrc,
    ScriptSrc,
    StyleSrc,
    WorkerSrc,
    ReportTo,
}

/// Shape of a directive's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Ordered list of source tokens.
    SourceList,
    /// Single opaque string.
    Scalar,
}

impl Directive {
    /// Wire token for this directive.
    pub const fn as_str(self) -> &'static str {
        match self {
            Directive::ChildSrc => "child-src",
            Directive::ConnectSrc => "connect-src",
            Directive::DefaultSrc => "default-src",
            Directive::FontSrc => "font-src",
            Directive::FrameSrc => "frame-src",
            Directive::ImgSrc => "img-src",
            Directive::ManifestSrc => "manifest-src",
            Directive::MediaSrc => "media-src",
            Directive::ObjectSrc => "object-src",
            Directive::ScriptSrc => "script-src",
            Directive::StyleSrc => "style-src",
            Directive::WorkerSrc => "worker-src",
            Directive::ReportTo => "report-to",
        }
    }

    pub const fn kind(self) -> SlotKind {
        match self {
            Directive::ReportTo => SlotKind::Scalar,
            _ => SlotKind::SourceList,
        }
    }

    /// Registry entry for this directive.
    pub fn entry(self) -> &'static DirectiveEntry {
        REGISTRY
            .iter()
            .find(|entry| entry.directive == self)
            .unwrap_or_else(|| unreachable!("every directive has a registry entry"))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CSP directive: {0}")]
pub struct UnknownDirective(pub String);

impl FromStr for Directive {
    type Err = UnknownDirective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .map(|entry| entry.directive)
            .find(|directive| directive.as_str() == s)
            .ok_or_else(|| UnknownDirective(s.to_string()))
    }
}

/// Read-only view of a directive slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    Sources(&'a SourceList),
    Scalar(&'a str),
}

impl Slot<'_> {
    /// A slot is present when it would appear in the encoded header.
    pub fn is_present(&self) -> bool {
        match self {
            Slot::Sources(sources) => !sources.is_empty(),
            Slot::Scalar(value) => !value.is_empty(),
        }
    }
}

/// Mutable view of a directive slot.
#[derive(Debug)]
pub enum SlotMut<'a> {
    Sources(&'a mut SourceList),
    Scalar(&'a mut String),
}

/// One row of the directive registry.
pub struct DirectiveEntry {
    pub directive: Directive,
    slot: fn(&Policy) -> Slot<'_>,
    slot_mut: fn(&mut Policy) -> SlotMut<'_>,
}

impl DirectiveEntry {
    pub fn slot<'a>(&self, policy: &'a Policy) -> Slot<'a> {
        (self.slot)(policy)
    }

    pub fn slot_mut<'a>(&self, policy: &'a mut Policy) -> SlotMut<'a> {
        (self.slot_mut)(policy)
    }
}

impl fmt::Debug for DirectiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveEntry")
            .field("directive", &self.directive)
            .field("kind", &self.directive.kind())
            .finish()
    }
}

/// Every directive, in canonical encode order.
pub static REGISTRY: [DirectiveEntry; 13] = [
    DirectiveEntry {
        directive: Directive::DefaultSrc,
        slot: |p| Slot::Sources(&p.default_src),
        slot_mut: |p| SlotMut::Sources(&mut p.default_src),
    },
    DirectiveEntry {
        directive: Directive::ChildSrc,
        slot: |p| Slot::Sources(&p.child_src),
        slot_mut: |p| SlotMut::Sources(&mut p.child_src),
    },
    DirectiveEntry {
        directive: Directive::ConnectSrc,
        slot: |p| Slot::Sources(&p.connect_src),
        slot_mut: |p| SlotMut::Sources(&mut p.connect_src),
    },
    DirectiveEntry {
        directive: Directive::FontSrc,
        slot: |p| Slot::Sources(&p.font_src),
        slot_mut: |p| SlotMut::Sources(&mut p.font_src),
    },
    DirectiveEntry {
        directive: Directive::FrameSrc,
        slot: |p| Slot::Sources(&p.frame_src),
        slot_mut: |p| SlotMut::Sources(&mut p.frame_src),
    },
    DirectiveEntry {
        directive: Directive::ImgSrc,
        slot: |p| Slot::Sources(&p.img_src),
        slot_mut: |p| SlotMut::Sources(&mut p.img_src),
    },
    DirectiveEntry {
        directive: Directive::ManifestSrc,
        slot: |p| Slot::Sources(&p.manifest_src),
        slot_mut: |p| SlotMut::Sources(&mut p.manifest_src),
    },
    DirectiveEntry {
        directive: Directive::MediaSrc,
        slot: |p| Slot::Sources(&p.media_src),
        slot_mut: |p| SlotMut::Sources(&mut p.media_src),
    },
    DirectiveEntry {
        directive: Directive::ObjectSrc,
        slot: |p| Slot::Sources(&p.object_src),
        slot_mut: |p| SlotMut::Sources(&mut p.object_src),
    },
    DirectiveEntry {
        directive: Directive::ScriptSrc,
        slot: |p| Slot::Sources(&p.script_src),
        slot_mut: |p| SlotMut::Sources(&mut p.script_src),
    },
    DirectiveEntry {
        directive: Directive::StyleSrc,
        slot: |p| Slot::Sources(&p.style_src),
        slot_mut: |p| SlotMut::Sources(&mut p.style_src),
    },
    DirectiveEntry {
        directive: Directive::WorkerSrc,
        slot: |p| Slot::Sources(&p.worker_src),
        slot_mut: |p| SlotMut::Sources(&mut p.worker_src),
    },
    DirectiveEntry {
        directive: Directive::ReportTo,
        slot: |p| Slot::Scalar(&p.report_to),
        slot_mut: |p| SlotMut::Scalar(&mut p.report_to),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let names: Vec<&str> = REGISTRY.iter().map(|e| e.directive.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "default-src",
                "child-src",
                "connect-src",
                "font-src",
                "frame-src",
                "img-src",
                "manifest-src",
                "media-src",
                "object-src",
                "script-src",
                "style-src",
                "worker-src",
                "report-to",
            ]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("img-src".parse::<Directive>(), Ok(Directive::ImgSrc));
        assert_eq!("report-to".parse::<Directive>(), Ok(Directive::ReportTo));
        assert!("base-uri".parse::<Directive>().is_err());
        // Names are matched exactly.
        assert!("IMG-SRC".parse::<Directive>().is_err());
    }

    #[test]
    fn test_slot_kinds() {
        for entry in REGISTRY.iter() {
            let policy = Policy::default();
            match (entry.directive.kind(), entry.slot(&policy)) {
                (SlotKind::SourceList, Slot::Sources(_)) | (SlotKind::Scalar, Slot::Scalar(_)) => {}
                (kind, slot) => panic!("{} declared {:?} but maps to {:?}", entry.directive, kind, slot),
            }
        }
    }

    #[test]
    fn test_entry_lookup() {
        let mut policy = Policy::default();
        if let SlotMut::Sources(sources) = Directive::MediaSrc.entry().slot_mut(&mut policy) {
            sources.push("media1.com");
        }
        assert_eq!(policy.media_src, SourceList::new(["media1.com"]));
    }
}
