use gifblocks::{
    ApplicationExtension, ByteIterator, DataBlock, ErrorState, GifComponent, GifError, LoopCount,
    NetscapeExtension, PackedFields,
};

fn netscape_identification() -> DataBlock {
    DataBlock::new(11, b"NETSCAPE2.0").unwrap()
}

#[test]
fn packed_fields_repack_every_byte() {
    for byte in 0..=u8::MAX {
        let fields = PackedFields::from(byte);
        let mut rebuilt = PackedFields::new();
        rebuilt
            .set_bits(0, 4, fields.get_bits(0, 4).unwrap())
            .unwrap();
        rebuilt
            .set_bits(4, 4, fields.get_bits(4, 4).unwrap())
            .unwrap();
        assert_eq!(u8::from(rebuilt), byte);
    }
}

#[test]
fn packed_fields_never_clamp() {
    let mut fields = PackedFields::new();
    for index in [8, 9, usize::MAX] {
        assert!(fields.set_bit(index, true).is_err());
        assert!(fields.get_bit(index).is_err());
        assert!(fields.set_bits(index, 1, 1).is_err());
        assert!(fields.get_bits(index, 1).is_err());
    }
    for (start, length) in [(0, 9), (7, 2), (4, 5), (2, usize::MAX)] {
        assert_eq!(
            fields.get_bits(start, length),
            Err(GifError::BitRangeOutOfRange { start, length })
        );
    }
    assert_eq!(fields.to_byte(), 0);
}

#[test]
fn data_blocks_from_a_stream() {
    let mut bytes = ByteIterator::from_slice(&[5, 1, 2, 3, 4, 5]);
    let block = DataBlock::read(&mut bytes);
    assert_eq!(
        (block.declared_size(), block.actual_size()),
        (5, 5)
    );
    assert_eq!(block.data(), [1, 2, 3, 4, 5]);
    assert_eq!(block.error_state(), ErrorState::empty());

    let mut bytes = ByteIterator::from_slice(&[5, 1, 2]);
    let block = DataBlock::read(&mut bytes);
    assert_eq!(block.actual_size(), 2);
    assert!(block.test_state(ErrorState::END_OF_INPUT_STREAM));
    assert!(block.get(2).is_err());
}

#[test]
fn application_extension_from_blocks() {
    let extension = ApplicationExtension::new(
        netscape_identification(),
        vec![DataBlock::new(3, &[1, 0, 0]).unwrap(), DataBlock::terminator()],
    )
    .unwrap();
    assert_eq!(extension.application_identifier(), "NETSCAPE");
    assert_eq!(extension.authentication_code(), "2.0");
}

#[test]
fn identification_length_rules() {
    let short = DataBlock::new(10, b"NETSCAPE2.").unwrap();
    assert_eq!(
        ApplicationExtension::new(short, vec![]),
        Err(GifError::IdentificationBlockTooShort(10))
    );

    let long = DataBlock::new(12, b"ABCDEFGHIJKL").unwrap();
    let extension = ApplicationExtension::new(long, vec![]).unwrap();
    assert!(extension.test_state(ErrorState::IDENTIFICATION_BLOCK_TOO_LONG));
    assert_eq!(extension.application_identifier(), "ABCDEFGH");
    assert_eq!(extension.authentication_code(), "IJK");
}

#[test]
fn netscape_round_trips() {
    for (repeat_count, sub_block) in [(0, [1, 0, 0]), (-1, [1, 255, 255]), (5, [1, 5, 0])] {
        let netscape = NetscapeExtension::new(repeat_count).unwrap();
        let extension = netscape.application_extension();
        assert_eq!(extension.application_data()[0].data(), sub_block);
        assert!(extension.application_data()[1].is_terminator());

        let mut wire = Vec::new();
        extension.write_to(&mut wire);
        let mut bytes = ByteIterator::from_slice(&wire);
        let reparsed = ApplicationExtension::read(&mut bytes).unwrap();
        assert_eq!(bytes.offset(), wire.len());

        let reparsed = NetscapeExtension::try_from(reparsed).unwrap();
        assert_eq!(
            reparsed.loop_count().map(LoopCount::to_raw),
            Some(repeat_count)
        );
    }
}

#[test]
fn netscape_rejects_other_applications() {
    let extension = ApplicationExtension::new(
        DataBlock::new(11, b"ImageMagick").unwrap(),
        vec![DataBlock::new(3, &[1, 0, 0]).unwrap()],
    )
    .unwrap();
    let err = NetscapeExtension::try_from(extension).unwrap_err();
    assert_eq!(err, GifError::NotNetscapeIdentifier("ImageMag".into()));
    assert!(err.to_string().contains("ImageMag"));
}

#[test]
fn stream_cursor_is_left_on_the_next_block() {
    let mut wire = Vec::new();
    NetscapeExtension::new(9)
        .unwrap()
        .application_extension()
        .write_to(&mut wire);
    let extension_len = wire.len();
    wire.extend_from_slice(&[0x21, 0xf9]);

    let mut bytes = ByteIterator::from_slice(&wire);
    let extension = ApplicationExtension::read(&mut bytes).unwrap();
    assert_eq!(bytes.offset(), extension_len);
    assert_eq!(bytes.next_byte(), Some(0x21));
    assert!(extension.status().is_ok());
}
