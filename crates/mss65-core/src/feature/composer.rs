use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::error::Result;
use crate::image::BinaryImage;
use crate::patch::{AppliedPatch, PatchLibrary, apply_patch, write_bytes};
use crate::variant::{OffsetSlot, OffsetTable};

use super::layout::{address, field, patches};
use super::{
    FeatureRequest, RemapStage, RevLimitByTemp, ThrottleMode, encode_temperature_array,
    encode_u16_array,
};

/// Turns a [`FeatureRequest`] into an ordered sequence of writes.
///
/// Features run in a fixed order: remap, VMAX, valet, AlphaN, rev limits,
/// throttle maps, emissions deletes, burble, transmission coding. Later
/// writes may overlap earlier ones. The first failing write aborts the
/// pass; writes already made stay in the image.
pub struct FeatureComposer<'a> {
    library: &'a PatchLibrary,
    table: &'a OffsetTable,
    default_offset: u64,
}

impl<'a> FeatureComposer<'a> {
    pub fn new(library: &'a PatchLibrary, table: &'a OffsetTable) -> Self {
        Self {
            library,
            table,
            default_offset: 0,
        }
    }

    /// Address used for library patches that carry no address rule
    pub fn with_default_offset(mut self, default_offset: u64) -> Self {
        self.default_offset = default_offset;
        self
    }

    /// Library patches the request will need, in application order
    pub fn required_patches(request: &FeatureRequest) -> Vec<&'static str> {
        let mut names = Vec::new();
        match request.remap {
            RemapStage::Off => {}
            RemapStage::Stage1 => names.push(patches::STAGE1_REMAP_MAIN),
            RemapStage::Stage2 => names.push(patches::STAGE2_REMAP_MAIN),
        }
        if request.remap != RemapStage::Off {
            names.extend(patches::REMAP_SUPPORT);
        }

        let toggles = [
            (request.vmax, patches::VMAX),
            (request.valet, patches::VALET),
            (request.sap_delete, patches::SAP_DELETE),
            (request.cold_start_delete, patches::COLD_START_DELETE),
            (request.cat_delete, patches::CAT_DELETE),
            (request.o2_delete, patches::O2_DELETE),
            (request.burble, patches::BURBLE),
        ];
        names.extend(
            toggles
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, name)| name),
        );
        names
    }

    /// Apply every requested feature to `image` in a single pass
    pub fn apply(
        &self,
        image: &mut BinaryImage,
        request: &FeatureRequest,
    ) -> Result<Vec<AppliedPatch>> {
        let mut applied = Vec::new();

        self.apply_remap(image, request.remap, &mut applied)?;

        if request.vmax {
            info!("Removing VMAX limiter");
            self.library_patch(image, patches::VMAX, &mut applied)?;
        }
        if request.valet {
            info!("Enabling valet mode");
            self.library_patch(image, patches::VALET, &mut applied)?;
        }
        if request.alphan {
            info!("Enabling AlphaN");
            self.write_field(
                image,
                "alphan",
                address::ALPHA_N,
                &[field::ALPHA_N_ENABLED],
                &mut applied,
            )?;
        }

        if let Some(gears) = &request.rev_limit_gear {
            info!("Writing rev limit per gear: {:?}", gears);
            self.write_field(
                image,
                "rev_limit_gear",
                address::REV_LIMIT_GEAR,
                &encode_u16_array(gears),
                &mut applied,
            )?;
        }
        if let Some(temp) = &request.rev_limit_temp {
            self.apply_rev_limit_temp(image, temp, &mut applied)?;
        }

        for mode in ThrottleMode::iter() {
            if let Some(map) = request.throttle.get(mode) {
                info!("Writing {} throttle map", mode);
                self.write_field(
                    image,
                    &format!("throttle_{}", mode),
                    mode.base_address(),
                    map,
                    &mut applied,
                )?;
            }
        }

        let deletes = [
            (request.sap_delete, "SAP delete", patches::SAP_DELETE),
            (
                request.cold_start_delete,
                "cold start delete",
                patches::COLD_START_DELETE,
            ),
            (request.cat_delete, "primary cat DTC delete", patches::CAT_DELETE),
            (request.o2_delete, "post-cat O2 DTC delete", patches::O2_DELETE),
            (request.burble, "overrun burble", patches::BURBLE),
        ];
        for (enabled, label, name) in deletes {
            if enabled {
                info!("Applying {}", label);
                self.library_patch(image, name, &mut applied)?;
            }
        }

        if let Some(byte) = request.transmission.coding_byte() {
            info!("Setting transmission coding to {}", request.transmission);
            self.write_field(
                image,
                "transmission_coding",
                address::TRANSMISSION_CODING,
                &[byte],
                &mut applied,
            )?;
        }

        Ok(applied)
    }

    fn apply_remap(
        &self,
        image: &mut BinaryImage,
        stage: RemapStage,
        applied: &mut Vec<AppliedPatch>,
    ) -> Result<()> {
        let main = match stage {
            RemapStage::Off => return Ok(()),
            RemapStage::Stage1 => patches::STAGE1_REMAP_MAIN,
            RemapStage::Stage2 => patches::STAGE2_REMAP_MAIN,
        };

        info!("Applying {} remap", stage);
        self.library_patch(image, main, applied)?;
        for name in patches::REMAP_SUPPORT {
            self.library_patch(image, name, applied)?;
        }
        Ok(())
    }

    fn apply_rev_limit_temp(
        &self,
        image: &mut BinaryImage,
        temp: &RevLimitByTemp,
        applied: &mut Vec<AppliedPatch>,
    ) -> Result<()> {
        info!(
            "Writing rev limit by temperature: rpm={:?} celsius={:?}",
            temp.rpm, temp.celsius
        );
        self.write_field(
            image,
            "rev_limit_temp_rpm",
            address::REV_LIMIT_TEMP_RPM,
            &encode_u16_array(&temp.rpm),
            applied,
        )?;
        self.write_field(
            image,
            "rev_limit_temp_breakpoints",
            address::REV_LIMIT_TEMP_BREAKPOINT,
            &encode_temperature_array(&temp.celsius),
            applied,
        )
    }

    fn library_patch(
        &self,
        image: &mut BinaryImage,
        name: &str,
        applied: &mut Vec<AppliedPatch>,
    ) -> Result<()> {
        let descriptor = self.library.get(name)?;
        let record = apply_patch(image, descriptor, self.table, self.default_offset)?;
        applied.push(record);
        Ok(())
    }

    /// Write computed bytes at a base-layout address shifted by
    /// `locationoffset1`
    fn write_field(
        &self,
        image: &mut BinaryImage,
        name: &str,
        base: u64,
        bytes: &[u8],
        applied: &mut Vec<AppliedPatch>,
    ) -> Result<()> {
        let address = self.shifted(base);
        debug!("{}: base {} -> 0x{:X}", name, base, address);
        applied.push(write_bytes(image, name, address, bytes)?);
        Ok(())
    }

    fn shifted(&self, base: u64) -> i128 {
        i128::from(base) + i128::from(self.table.get(OffsetSlot::LocationOffset1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::feature::{ThrottleMaps, TransmissionMode};
    use crate::patch::{AddressRule, PatchDescriptor};
    use crate::variant::resolve_offsets;

    const BASE_LEN: usize = 786_432;
    const EXTENDED_LEN: usize = 788_740;

    fn test_library() -> PatchLibrary {
        let mut descriptors = vec![
            PatchDescriptor::new(
                patches::STAGE1_REMAP_MAIN,
                "11 11 11 11",
                AddressRule::relative(OffsetSlot::LocationOffset2, 200_000),
            ),
            PatchDescriptor::new(
                patches::STAGE2_REMAP_MAIN,
                "22 22 22 22 22 22",
                AddressRule::relative(OffsetSlot::LocationOffset2, 200_000),
            ),
            PatchDescriptor::new(patches::VMAX, "EE", AddressRule::Fixed(300_000)),
            PatchDescriptor::new(
                patches::VALET,
                "01",
                AddressRule::relative(OffsetSlot::LocationOffset8, 300_010),
            ),
            PatchDescriptor::new(patches::SAP_DELETE, "00 00", AddressRule::Fixed(300_020)),
            PatchDescriptor::new(
                patches::COLD_START_DELETE,
                "00",
                AddressRule::Fixed(300_030),
            ),
            PatchDescriptor::new(patches::CAT_DELETE, "00", AddressRule::Fixed(300_040)),
            PatchDescriptor::new(patches::O2_DELETE, "00", AddressRule::Fixed(300_050)),
            PatchDescriptor::new(patches::BURBLE, "B0 B1", AddressRule::Fixed(300_060)),
        ];
        for (i, name) in patches::REMAP_SUPPORT.iter().enumerate() {
            descriptors.push(PatchDescriptor::new(
                *name,
                format!("{:02X} {:02X}", i, i),
                AddressRule::relative(OffsetSlot::LocationOffset12, 210_000 + i as u64 * 4),
            ));
        }
        PatchLibrary::from_descriptors(descriptors)
    }

    fn compose(len: usize, request: &FeatureRequest) -> Result<(BinaryImage, Vec<AppliedPatch>)> {
        let library = test_library();
        let resolution = resolve_offsets(len);
        let mut image = BinaryImage::zeroed(len);
        let applied = FeatureComposer::new(&library, &resolution.table).apply(&mut image, request)?;
        Ok((image, applied))
    }

    #[test]
    fn test_empty_request_changes_nothing() {
        let (image, applied) = compose(BASE_LEN, &FeatureRequest::default()).unwrap();
        assert!(applied.is_empty());
        assert_eq!(image, BinaryImage::zeroed(BASE_LEN));
    }

    #[test]
    fn test_alphan_only() {
        let request = FeatureRequest {
            alphan: true,
            ..Default::default()
        };
        let (image, _) = compose(BASE_LEN, &request).unwrap();

        let mut expected = vec![0u8; BASE_LEN];
        expected[127_144] = 0x01;
        assert_eq!(image.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_alphan_shifted_on_extended() {
        let request = FeatureRequest {
            alphan: true,
            ..Default::default()
        };
        let (image, applied) = compose(EXTENDED_LEN, &request).unwrap();
        assert_eq!(applied[0].address, 127_144 + 4860);
        assert_eq!(image.as_bytes()[127_144 + 4860], 0x01);
        assert_eq!(image.as_bytes()[127_144], 0x00);
    }

    #[test]
    fn test_stage1_applies_documented_set() {
        let request = FeatureRequest {
            remap: RemapStage::Stage1,
            ..Default::default()
        };
        let (image, applied) = compose(BASE_LEN, &request).unwrap();

        let names: Vec<_> = applied.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], patches::STAGE1_REMAP_MAIN);
        assert_eq!(&names[1..], &patches::REMAP_SUPPORT[..]);
        assert!(!names.contains(&patches::STAGE2_REMAP_MAIN));

        // Stage 2 main is longer; stage 1 must not touch its tail
        assert_eq!(&image.as_bytes()[200_000..200_006], &[0x11, 0x11, 0x11, 0x11, 0, 0]);
    }

    #[test]
    fn test_stage2_uses_stage2_main() {
        let request = FeatureRequest {
            remap: RemapStage::Stage2,
            ..Default::default()
        };
        let (image, applied) = compose(BASE_LEN, &request).unwrap();
        assert_eq!(applied[0].name, patches::STAGE2_REMAP_MAIN);
        assert_eq!(&image.as_bytes()[200_000..200_006], &[0x22; 6]);
    }

    #[test]
    fn test_stage1_idempotent() {
        let request = FeatureRequest {
            remap: RemapStage::Stage1,
            ..Default::default()
        };
        let library = test_library();
        let table = OffsetTable::zero();
        let composer = FeatureComposer::new(&library, &table);

        let mut image = BinaryImage::from_bytes((0..BASE_LEN).map(|i| (i % 251) as u8).collect());
        composer.apply(&mut image, &request).unwrap();
        let once = image.clone();
        composer.apply(&mut image, &request).unwrap();
        assert_eq!(image, once);
    }

    #[test]
    fn test_rev_limit_gear_encoding() {
        let request = FeatureRequest {
            rev_limit_gear: Some([8250, 8300, 8350, 8400, 8450, 8500, 8550, 0x0102]),
            ..Default::default()
        };
        let (image, applied) = compose(BASE_LEN, &request).unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].len, 16);

        let bytes = &image.as_bytes()[19_610..19_626];
        assert_eq!(&bytes[0..2], &[0x3A, 0x20]);
        assert_eq!(&bytes[14..16], &[0x02, 0x01]);
        assert_eq!(image.as_bytes()[19_609], 0);
        assert_eq!(image.as_bytes()[19_626], 0);
    }

    #[test]
    fn test_rev_limit_temp_encoding() {
        let request = FeatureRequest {
            rev_limit_temp: Some(RevLimitByTemp::default()),
            ..Default::default()
        };
        let (image, applied) = compose(BASE_LEN, &request).unwrap();
        assert_eq!(applied.len(), 2);

        let bytes = image.as_bytes();
        assert_eq!(&bytes[19_660..19_662], &[0x3A, 0x20]);
        // second breakpoint is 80 C -> 3532
        assert_eq!(u16::from_le_bytes([bytes[19_676], bytes[19_677]]), 3532);
        assert_eq!(u16::from_le_bytes([bytes[19_674], bytes[19_675]]), 3432);
    }

    #[test]
    fn test_throttle_maps_written_in_mode_order() {
        let request = FeatureRequest {
            throttle: ThrottleMaps {
                comfort: Some([1; 16]),
                normal: None,
                sport: Some(ThrottleMaps::linear()),
            },
            ..Default::default()
        };
        let (image, applied) = compose(BASE_LEN, &request).unwrap();

        let names: Vec<_> = applied.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["throttle_comfort", "throttle_sport"]);

        let bytes = image.as_bytes();
        assert_eq!(&bytes[33_988..34_004], &[1; 16]);
        assert_eq!(&bytes[34_004..34_020], &[0; 16]);
        assert_eq!(bytes[34_020 + 15], 240);
    }

    #[test]
    fn test_transmission_modes() {
        for (mode, expected) in [
            (TransmissionMode::Manual, 0x01),
            (TransmissionMode::Smg, 0x02),
        ] {
            let request = FeatureRequest {
                transmission: mode,
                ..Default::default()
            };
            let (image, _) = compose(BASE_LEN, &request).unwrap();
            assert_eq!(image.as_bytes()[36_000], expected);
        }

        let request = FeatureRequest {
            transmission: TransmissionMode::NoChange,
            ..Default::default()
        };
        let (_, applied) = compose(BASE_LEN, &request).unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    fn test_full_request_order() {
        let request = FeatureRequest {
            remap: RemapStage::Stage1,
            vmax: true,
            valet: true,
            alphan: true,
            rev_limit_gear: Some([8250; 8]),
            rev_limit_temp: Some(RevLimitByTemp::default()),
            throttle: ThrottleMaps {
                comfort: Some(ThrottleMaps::linear()),
                normal: Some(ThrottleMaps::linear()),
                sport: Some(ThrottleMaps::linear()),
            },
            sap_delete: true,
            cold_start_delete: true,
            cat_delete: true,
            o2_delete: true,
            burble: true,
            transmission: TransmissionMode::Smg,
        };
        let (_, applied) = compose(EXTENDED_LEN, &request).unwrap();
        let names: Vec<_> = applied.iter().map(|p| p.name.as_str()).collect();

        let mut expected = vec![patches::STAGE1_REMAP_MAIN];
        expected.extend(patches::REMAP_SUPPORT);
        expected.extend([
            patches::VMAX,
            patches::VALET,
            "alphan",
            "rev_limit_gear",
            "rev_limit_temp_rpm",
            "rev_limit_temp_breakpoints",
            "throttle_comfort",
            "throttle_normal",
            "throttle_sport",
            patches::SAP_DELETE,
            patches::COLD_START_DELETE,
            patches::CAT_DELETE,
            patches::O2_DELETE,
            patches::BURBLE,
            "transmission_coding",
        ]);
        assert_eq!(names, expected);

        let library_names: Vec<_> = names
            .iter()
            .copied()
            .filter(|n| test_library().contains(n))
            .collect();
        assert_eq!(library_names, FeatureComposer::required_patches(&request));
    }

    #[test]
    fn test_missing_patch_aborts_after_earlier_writes() {
        let library = PatchLibrary::from_descriptors([PatchDescriptor::new(
            patches::VMAX,
            "EE",
            AddressRule::Fixed(10),
        )]);
        let table = OffsetTable::zero();
        let mut image = BinaryImage::zeroed(BASE_LEN);
        let request = FeatureRequest {
            vmax: true,
            valet: true,
            ..Default::default()
        };

        let err = FeatureComposer::new(&library, &table)
            .apply(&mut image, &request)
            .unwrap_err();
        assert!(matches!(err, Error::PatchNotFound(ref name) if name == patches::VALET));
        // no rollback of the VMAX write
        assert_eq!(image.as_bytes()[10], 0xEE);
    }

    #[test]
    fn test_field_out_of_bounds_on_short_image() {
        let request = FeatureRequest {
            alphan: true,
            ..Default::default()
        };
        let err = compose(100_000, &request).unwrap_err();
        assert_eq!(err.patch_name(), Some("alphan"));
        assert!(matches!(err, Error::OutOfBounds { .. }));
    }

    #[test]
    fn test_default_offset_for_unaddressed_patch() {
        let library = PatchLibrary::from_descriptors([PatchDescriptor::at_default(
            patches::BURBLE,
            "AA",
        )]);
        let table = OffsetTable::zero();
        let mut image = BinaryImage::zeroed(64);
        let request = FeatureRequest {
            burble: true,
            ..Default::default()
        };
        FeatureComposer::new(&library, &table)
            .with_default_offset(32)
            .apply(&mut image, &request)
            .unwrap();
        assert_eq!(image.as_bytes()[32], 0xAA);
    }
}
