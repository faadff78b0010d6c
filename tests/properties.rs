//! Property checks of the accessor and normalizer laws.

use nditem::{
    copy_swap, get_item, set_item, ArrayMemory, ByteOrder, ElementType, HostValue, IndexArg,
    IndexComponent, IndexConfig, IndexError, IndexNormalizer, IntpArray, ItemError, ItemValue,
    MemoryArray, SliceArg, StandardConversion, Width,
};
use num_complex::{Complex32, Complex64};
use proptest::prelude::*;

/// Any item of a type with a registered accessor
fn gen_item() -> impl Strategy<Value = ItemValue> {
    prop_oneof![
        any::<bool>().prop_map(ItemValue::Bool),
        any::<i8>().prop_map(ItemValue::I8),
        any::<u8>().prop_map(ItemValue::U8),
        any::<i16>().prop_map(ItemValue::I16),
        any::<u16>().prop_map(ItemValue::U16),
        any::<i32>().prop_map(ItemValue::I32),
        any::<u32>().prop_map(ItemValue::U32),
        any::<i64>().prop_map(ItemValue::I64),
        any::<u64>().prop_map(ItemValue::U64),
        (-1.0e6f32..1.0e6f32).prop_map(ItemValue::F32),
        (-1.0e12f64..1.0e12f64).prop_map(ItemValue::F64),
        (-1.0e6f32..1.0e6f32, -1.0e6f32..1.0e6f32)
            .prop_map(|(re, im)| ItemValue::C64(Complex32::new(re, im))),
        (-1.0e12f64..1.0e12f64, -1.0e12f64..1.0e12f64)
            .prop_map(|(re, im)| ItemValue::C128(Complex64::new(re, im))),
    ]
}

/// A zero-filled array in one of the four layouts (native or swapped,
/// aligned or not)
fn layout(ty: ElementType, len: usize, swapped: bool, unaligned: bool) -> MemoryArray {
    let mut arr = MemoryArray::new(ty, vec![len]);
    if swapped {
        arr = arr.with_byte_order(ByteOrder::Swapped);
    }
    if unaligned {
        arr = arr.unaligned();
    }
    arr
}

fn gen_width() -> impl Strategy<Value = Width> {
    prop_oneof![Just(Width::Two), Just(Width::Four), Just(Width::Eight)]
}

proptest! {
    #[test]
    fn roundtrip_every_registered_type_and_layout(
        value in gen_item(),
        index in 0usize..8,
        swapped in any::<bool>(),
        unaligned in any::<bool>(),
    ) {
        let ty = value.element_type();
        let mut arr = layout(ty, 8, swapped, unaligned);
        let offset = index * ty.itemsize();

        set_item(&mut arr, &HostValue::Item(value), offset, &StandardConversion).unwrap();
        prop_assert_eq!(get_item(&arr, offset).unwrap(), value);
    }

    #[test]
    fn writes_do_not_touch_neighbours(
        value in gen_item(),
        swapped in any::<bool>(),
        unaligned in any::<bool>(),
    ) {
        let ty = value.element_type();
        let mut arr = layout(ty, 3, swapped, unaligned);
        let before = arr.bytes().to_vec();
        let itemsize = ty.itemsize();

        set_item(&mut arr, &HostValue::Item(value), itemsize, &StandardConversion).unwrap();

        prop_assert_eq!(&arr.bytes()[..itemsize], &before[..itemsize]);
        prop_assert_eq!(&arr.bytes()[2 * itemsize..], &before[2 * itemsize..]);
    }

    #[test]
    fn swapped_layout_stores_reversed_bytes(v in any::<u64>()) {
        let mut arr = MemoryArray::new(ElementType::ULong, vec![1]).with_byte_order(ByteOrder::Swapped);
        set_item(&mut arr, &HostValue::Item(ItemValue::U64(v)), 0, &StandardConversion).unwrap();
        prop_assert_eq!(arr.bytes(), &v.swap_bytes().to_ne_bytes()[..]);
    }

    #[test]
    fn copy_swap_identity_and_involution(
        (width, src) in gen_width()
            .prop_flat_map(|w| (Just(w), prop::collection::vec(any::<u8>(), w.bytes()))),
    ) {
        let n = width.bytes();
        let mut once = vec![0u8; n];
        let mut twice = vec![0u8; n];

        copy_swap(width, &mut once, &src, false);
        prop_assert_eq!(&once, &src);

        copy_swap(width, &mut once, &src, true);
        let reversed: Vec<u8> = src.iter().rev().copied().collect();
        prop_assert_eq!(&once, &reversed);

        copy_swap(width, &mut twice, &once, true);
        prop_assert_eq!(&twice, &src);
    }

    #[test]
    fn failed_write_leaves_buffer_unchanged(value in gen_item()) {
        let mut arr = MemoryArray::new(value.element_type(), vec![1]);
        set_item(&mut arr, &HostValue::Item(value), 0, &StandardConversion).unwrap();
        let before = arr.bytes().to_vec();

        for bad in [HostValue::None, HostValue::Opaque("object".into())] {
            let err = set_item(&mut arr, &bad, 0, &StandardConversion).unwrap_err();
            prop_assert!(matches!(err, ItemError::NotConvertible { .. }), "{}", err);
            prop_assert_eq!(arr.bytes(), &before[..]);
        }
    }

    #[test]
    fn integer_arguments_normalize_to_themselves(v in any::<i32>()) {
        let index = IndexNormalizer::default()
            .normalize(&[IndexArg::Int(v.into())])
            .unwrap();
        prop_assert_eq!(index.as_slice(), &[IndexComponent::Int(v as isize)][..]);
    }

    #[test]
    fn flat_integer_lists_are_one_fancy_index(
        values in prop::collection::vec(-100i64..100, 1..64),
    ) {
        let index = IndexNormalizer::default()
            .normalize(&[values.clone().into()])
            .unwrap();

        let expected: Vec<isize> = values.iter().map(|&v| v as isize).collect();
        prop_assert_eq!(
            index.as_slice(),
            &[IndexComponent::IntArray(IntpArray::from_vec(expected))][..]
        );
    }
}

#[test]
fn tuple_like_lists_unpack_in_order() {
    let normalizer = IndexNormalizer::default();
    let arg = IndexArg::Sequence(vec![
        IndexArg::Ellipsis,
        IndexArg::Int(3),
        SliceArg::new(Some(1), None, Some(2)).into(),
        IndexArg::NewAxis,
    ]);

    let index = normalizer.normalize(&[arg]).unwrap();
    assert_eq!(
        index.as_slice(),
        &[
            IndexComponent::Ellipsis,
            IndexComponent::Int(3),
            IndexComponent::Slice(SliceArg::new(Some(1), None, Some(2))),
            IndexComponent::NewAxis,
        ]
    );
    assert_eq!(index.explicit_dims(), 2);
}

#[test]
fn argument_count_is_checked_for_every_cap() {
    for max in 1..8 {
        let normalizer = IndexNormalizer::new(IndexConfig::new(max));

        let ok: Vec<IndexArg> = (0..max as i64).map(IndexArg::from).collect();
        assert_eq!(normalizer.normalize(&ok).unwrap().len(), max);

        let too_many: Vec<IndexArg> = (0..=max as i64).map(IndexArg::from).collect();
        assert_eq!(
            normalizer.normalize(&too_many).unwrap_err(),
            IndexError::TooManyIndices {
                count: max + 1,
                max
            }
        );
    }
}
