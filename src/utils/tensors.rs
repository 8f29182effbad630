use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

/// Stack token id lists into a `[batch, seq_length]` tensor, padding or cutting each row to length
pub fn pad_to<B: Backend>(
    pad_token: usize,
    tokens_list: Vec<Vec<usize>>,
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = tokens_list.len();

    let mut values: Vec<B::IntElem> = Vec::with_capacity(batch_size * seq_length);

    for tokens in tokens_list {
        let taken = tokens.len().min(seq_length);

        values.extend(
            tokens
                .into_iter()
                .take(seq_length)
                .map(|t| (t as i64).elem::<B::IntElem>()),
        );
        values.extend((taken..seq_length).map(|_| (pad_token as i64).elem::<B::IntElem>()));
    }

    let data = Data::<B::IntElem, 2>::new(values, Shape::new([batch_size, seq_length]));

    Tensor::from_data(data, device)
}

/// Build a `[batch, 1]` float column from binary labels
pub fn label_column<B: Backend>(labels: &[u8], device: &B::Device) -> Tensor<B, 2> {
    let values: Vec<B::FloatElem> = labels.iter().map(|&label| (label as f32).elem()).collect();
    let data = Data::<B::FloatElem, 2>::new(values, Shape::new([labels.len(), 1]));

    Tensor::from_data(data, device)
}

/// Copy a float tensor back to the host as a flat list
pub fn to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor.into_data().convert::<f32>().value
}
