mod field_codec_test;
