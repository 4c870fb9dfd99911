/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

/// Features advertised in the FEAT reply.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FtpServerFeature {
    utf8: bool,
    mlst: bool,
    epsv: bool,
    size: bool,
    mdtm: bool,
    rest_stream: bool,
}

impl FtpServerFeature {
    /// Parse one feature line, with the leading space already trimmed.
    pub(crate) fn parse_and_set(&mut self, line: &str) {
        let (name, param) = match line.split_once(' ') {
            Some((name, param)) => (name, param.trim()),
            None => (line, ""),
        };

        match name.to_ascii_uppercase().as_str() {
            "UTF8" => self.utf8 = true,
            "MLST" => self.mlst = true,
            "EPSV" => self.epsv = true,
            "SIZE" => self.size = true,
            "MDTM" => self.mdtm = true,
            "REST" => {
                if param.eq_ignore_ascii_case("STREAM") {
                    self.rest_stream = true;
                }
            }
            _ => {}
        }
    }

    #[inline]
    pub fn support_utf8_path(&self) -> bool {
        self.utf8
    }

    #[inline]
    pub fn support_mlst(&self) -> bool {
        self.mlst
    }

    #[inline]
    pub fn support_epsv(&self) -> bool {
        self.epsv
    }

    #[inline]
    pub fn support_file_size(&self) -> bool {
        self.size
    }

    #[inline]
    pub fn support_file_mtime(&self) -> bool {
        self.mdtm
    }

    #[inline]
    pub fn support_rest_stream(&self) -> bool {
        self.rest_stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let mut feature = FtpServerFeature::default();
        feature.parse_and_set("UTF8");
        feature.parse_and_set("MLST type*;size*;modify*;");
        feature.parse_and_set("rest stream");
        feature.parse_and_set("LANG EN*");
        assert!(feature.support_utf8_path());
        assert!(feature.support_mlst());
        assert!(feature.support_rest_stream());
        assert!(!feature.support_epsv());
        assert!(!feature.support_file_size());
        assert!(!feature.support_file_mtime());
    }

    #[test]
    fn rest_without_stream() {
        let mut feature = FtpServerFeature::default();
        feature.parse_and_set("REST");
        assert!(!feature.support_rest_stream());
    }
}
